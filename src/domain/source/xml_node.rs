/// Owned, read-only XML element tree. Only elements are kept; comments,
/// processing instructions and attributes are dropped at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    /// Qualified tag: `{namespace}local` when namespaced, else `local`
    pub tag: String,
    pub local_name: String,
    /// Text directly inside the element, before its first child element
    pub text: Option<String>,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(tag: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            local_name: local_name.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Immediate children carrying `tag`, in document order
    pub fn children_with_tag<'a>(&'a self, tag: &str) -> Vec<&'a XmlNode> {
        self.children.iter().filter(|c| c.tag == tag).collect()
    }
}
