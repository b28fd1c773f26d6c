/// Read-only query surface over an already-parsed document.
///
/// Implementations hand out cheap copyable handles; only element nodes are
/// ever yielded by `element_children`.
pub trait TreeNode: Copy {
    type Children: Iterator<Item = Self>;

    fn tag_name(&self) -> &str;
    fn element_children(&self) -> Self::Children;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn text(&self) -> Option<&str>;

    fn children_named(&self, name: &str) -> Vec<Self> {
        self.element_children()
            .filter(|child| child.tag_name() == name)
            .collect()
    }

    fn child_named(&self, name: &str) -> Option<Self> {
        self.element_children().find(|child| child.tag_name() == name)
    }

    fn has_child(&self, name: &str) -> bool {
        self.child_named(name).is_some()
    }

    /// Trimmed text of the first child named `name`.
    fn child_text(&self, name: &str) -> Option<String> {
        let child = self.child_named(name)?;
        child.text().map(|text| text.trim().to_string())
    }
}
