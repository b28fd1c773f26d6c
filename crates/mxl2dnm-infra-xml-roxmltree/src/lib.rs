use mxl2dnm_ports::source::SourceError;
use mxl2dnm_ports::tree::TreeNode;
use roxmltree::{Document, ParsingOptions};
use std::io::{ErrorKind, Read};
use std::path::Path;
use zip::ZipArchive;

pub struct MusicXmlDocument<'input> {
    doc: Document<'input>,
}

impl<'input> MusicXmlDocument<'input> {
    pub fn parse(xml: &'input str) -> Result<Self, SourceError> {
        // MusicXML files usually carry a DOCTYPE pointing at the public DTD.
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(xml, options)
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(Self { doc })
    }

    /// The document node, parent of the `score-partwise`/`score-timewise` element.
    pub fn root(&self) -> XmlNode<'_, 'input> {
        XmlNode(self.doc.root())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct XmlNode<'a, 'input: 'a>(pub roxmltree::Node<'a, 'input>);

pub struct XmlChildren<'a, 'input: 'a>(roxmltree::Children<'a, 'input>);

impl<'a, 'input: 'a> Iterator for XmlChildren<'a, 'input> {
    type Item = XmlNode<'a, 'input>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.by_ref().find(|node| node.is_element()).map(XmlNode)
    }
}

impl<'a, 'input: 'a> TreeNode for XmlNode<'a, 'input> {
    type Children = XmlChildren<'a, 'input>;

    fn tag_name(&self) -> &str {
        self.0.tag_name().name()
    }

    fn element_children(&self) -> Self::Children {
        XmlChildren(self.0.children())
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.0.attribute(name)
    }

    fn text(&self) -> Option<&str> {
        self.0.text()
    }
}

pub fn read_musicxml_path(path: &Path) -> Result<String, SourceError> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    if ext.eq_ignore_ascii_case("mxl") {
        return read_mxl_archive(path);
    }
    std::fs::read_to_string(path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, err: std::io::Error) -> SourceError {
    if err.kind() == ErrorKind::NotFound {
        SourceError::ResourceNotFound(path.display().to_string())
    } else {
        SourceError::Io(err.to_string())
    }
}

fn read_mxl_archive(path: &Path) -> Result<String, SourceError> {
    let data = std::fs::read(path).map_err(|e| io_error(path, e))?;
    let mut archive = ZipArchive::new(std::io::Cursor::new(data))
        .map_err(|e| SourceError::Archive(e.to_string()))?;

    let container_xml = if let Ok(mut container) = archive.by_name("META-INF/container.xml") {
        let mut xml = String::new();
        container
            .read_to_string(&mut xml)
            .map_err(|e| SourceError::Io(e.to_string()))?;
        Some(xml)
    } else {
        None
    };

    if let Some(container_xml) = container_xml {
        if let Some(full_path) = rootfile_path(&container_xml) {
            if let Ok(mut rootfile) = archive.by_name(&full_path) {
                let mut xml = String::new();
                rootfile
                    .read_to_string(&mut xml)
                    .map_err(|e| SourceError::Io(e.to_string()))?;
                return Ok(xml);
            }
        }
    }

    for idx in 0..archive.len() {
        let mut file = archive
            .by_index(idx)
            .map_err(|e| SourceError::Archive(e.to_string()))?;
        let name = file.name().to_string();
        if name.ends_with(".xml") && !name.starts_with("META-INF/") {
            let mut xml = String::new();
            file.read_to_string(&mut xml)
                .map_err(|e| SourceError::Io(e.to_string()))?;
            return Ok(xml);
        }
    }

    Err(SourceError::ResourceNotFound(format!(
        "{}: archive has no MusicXML payload",
        path.display()
    )))
}

fn rootfile_path(container_xml: &str) -> Option<String> {
    let doc = Document::parse(container_xml).ok()?;
    doc.descendants()
        .find(|node| node.has_tag_name("rootfile"))
        .and_then(|node| node.attribute("full-path"))
        .map(|path| path.to_string())
}
