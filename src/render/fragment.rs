/// Mutable view of one element matched inside a fragment.
pub trait ElementMut {
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<String>;

    /// Sets `name` to `value`, replacing any previous value.
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// Query and mutation capability of an already parsed piece of markup.
///
/// Implementations visit every element whose tag name matches one of `tag_names`
/// (ASCII case-insensitive), at any depth, in document order.
pub trait HtmlFragment {
    fn for_each_element(&mut self, tag_names: &[&str], mutate: &mut dyn FnMut(&mut dyn ElementMut));
}
