//! RDF vocabulary constants used by the microdata extraction.
//!
//! - `rdf:` / `xsd:` -- standard namespaces
//! - `md:` -- the W3C microdata registry and format identifiers

/// Standard RDF namespace URIs
pub mod standard {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// Microdata attribute names and registry keys
pub mod md {
    pub const FORMAT_URI: &str = "http://www.w3.org/ns/formats/md";

    pub const ITEMSCOPE: &str = "itemscope";
    pub const ITEMTYPE: &str = "itemtype";
    pub const ITEMID: &str = "itemid";
    pub const ITEMPROP: &str = "itemprop";
    pub const ITEMREF: &str = "itemref";
    pub const ID: &str = "id";
    pub const LANG: &str = "lang";

    // Registry property attribute keys
    pub const SUB_PROPERTY_OF: &str = "subPropertyOf";
    pub const EQUIVALENT_PROPERTY: &str = "equivalentProperty";
}

/// Prefixes registered with serializers that compact IRIs.
pub const WELL_KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("rdf", standard::RDF),
    ("rdfs", standard::RDFS),
    ("xsd", standard::XSD),
    ("schema", "http://schema.org/"),
];
