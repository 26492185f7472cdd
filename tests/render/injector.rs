use crate::common::{FakeElement, FakeFragment};
use actix_web_csp_nonce::{CspError, DocumentSections, FragmentGroup, NonceInjector};

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> DocumentSections<FakeFragment> {
        DocumentSections::new()
            .with(FragmentGroup::Head, FakeFragment::new(&["meta", "link", "style"]))
            .with(FragmentGroup::Body, FakeFragment::new(&["div", "script", "p"]))
            .with(FragmentGroup::BodyPrepend, FakeFragment::new(&["SCRIPT"]))
            .with(FragmentGroup::BodyAppend, FakeFragment::new(&["span", "link"]))
    }

    #[test]
    fn test_stamps_every_nonce_tag_in_all_groups() {
        let mut document = document();
        let injector = NonceInjector::new("abc123").unwrap();

        let stamped = injector.inject(&mut document);

        assert_eq!(stamped, 5);
        for fragment in document.fragments() {
            for element in &fragment.elements {
                let is_nonce_tag = ["link", "script", "style"]
                    .iter()
                    .any(|tag| tag.eq_ignore_ascii_case(&element.tag));
                if is_nonce_tag {
                    assert_eq!(element.attributes.get("nonce").map(String::as_str), Some("abc123"));
                } else {
                    assert!(element.attributes.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_overwrites_existing_nonce() {
        let mut fragment = FakeFragment {
            elements: vec![FakeElement::new("script").with_attribute("nonce", "stale")],
        };

        NonceInjector::new("fresh")
            .unwrap()
            .inject_fragment(&mut fragment);

        assert_eq!(fragment.nonce_of(0), Some("fresh"));
    }

    #[test]
    fn test_other_attributes_are_kept() {
        let mut fragment = FakeFragment {
            elements: vec![FakeElement::new("link").with_attribute("rel", "stylesheet")],
        };

        NonceInjector::new("n").unwrap().inject_fragment(&mut fragment);

        let attributes = &fragment.elements[0].attributes;
        assert_eq!(attributes.get("rel").map(String::as_str), Some("stylesheet"));
        assert_eq!(attributes.get("nonce").map(String::as_str), Some("n"));
    }

    #[test]
    fn test_empty_groups_are_a_no_op() {
        let mut document = DocumentSections::<FakeFragment>::new()
            .with(FragmentGroup::Body, FakeFragment::default());

        assert_eq!(NonceInjector::new("n").unwrap().inject(&mut document), 0);
    }

    #[test]
    fn test_empty_nonce_is_rejected() {
        assert!(matches!(
            NonceInjector::new(""),
            Err(CspError::InvalidNonceValue(_))
        ));
    }
}
