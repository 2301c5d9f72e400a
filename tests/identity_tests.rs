use microdata2rdf::dom::NodeId;
use microdata2rdf::extraction::identity::SubjectIdentityMap;
use microdata2rdf::model::term::Subject;

#[test]
fn mapping_is_write_once() {
    let mut map = SubjectIdentityMap::new("b");
    assert!(map.is_empty());

    let node = NodeId(3);
    assert!(map.insert(node, Subject::Iri("http://example.org/a".to_string())));
    assert!(!map.insert(node, Subject::Iri("http://example.org/b".to_string())));

    assert!(map.contains(node));
    assert!(!map.contains(NodeId(4)));
    assert_eq!(map.get(node), Some(&Subject::Iri("http://example.org/a".to_string())));
    assert_eq!(map.len(), 1);
}

#[test]
fn blank_labels_count_up_from_zero() {
    let mut map = SubjectIdentityMap::new("b2_");
    assert_eq!(map.fresh_blank(), Subject::Blank("b2_0".to_string()));
    assert_eq!(map.fresh_blank(), Subject::Blank("b2_1".to_string()));
    // Allocation does not record a mapping.
    assert!(map.is_empty());
}
