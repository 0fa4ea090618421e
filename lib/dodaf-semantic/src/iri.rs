//! Phantom-typed IRIs.
//!
//! An [`Iri`] is a plain string compared by value, tagged at the type level with what it names
//! (a class, a property, a datatype or anything else) so that a datatype cannot be passed where a
//! class is expected.

use oxiri::IriParseError;
use oxrdf::{NamedNode, NamedNodeRef};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Type-level tags for [`Iri`].
pub mod kind {
    /// An OWL/RDFS class.
    #[derive(Debug, Clone, Copy)]
    pub struct Class;

    /// An RDF property.
    #[derive(Debug, Clone, Copy)]
    pub struct Property;

    /// A literal datatype.
    #[derive(Debug, Clone, Copy)]
    pub struct Datatype;

    /// Any other resource: ontologies, individuals, SHACL terms.
    #[derive(Debug, Clone, Copy)]
    pub struct Resource;
}

pub type ClassIri = Iri<kind::Class>;
pub type PropertyIri = Iri<kind::Property>;
pub type DatatypeIri = Iri<kind::Datatype>;
pub type ResourceIri = Iri<kind::Resource>;

/// An absolute IRI tagged with the kind of resource it names.
pub struct Iri<K> {
    value: Cow<'static, str>,
    kind: PhantomData<fn() -> K>,
}

impl<K> Iri<K> {
    /// Wraps a compile-time constant. Only the vocabulary registry builds IRIs this way.
    pub(crate) const fn from_static(value: &'static str) -> Self {
        Self {
            value: Cow::Borrowed(value),
            kind: PhantomData,
        }
    }

    /// Parses an absolute IRI.
    ///
    /// ```
    /// use dodaf_semantic::ClassIri;
    ///
    /// let widget = ClassIri::parse("https://ex.org#Widget")?;
    /// assert_eq!(widget.local_name(), "Widget");
    /// assert!(ClassIri::parse("not an iri").is_err());
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn parse(value: impl Into<String>) -> Result<Self, IriParseError> {
        let value = oxiri::Iri::parse(value.into())?.into_inner();
        Ok(Self {
            value: Cow::Owned(value),
            kind: PhantomData,
        })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The substring after the last `#` or `/`.
    pub fn local_name(&self) -> &str {
        self.value.rsplit(['#', '/']).next().unwrap_or(&self.value)
    }

    #[inline]
    pub fn as_named_node(&self) -> NamedNodeRef<'_> {
        NamedNodeRef::new_unchecked(&self.value)
    }

    #[inline]
    pub fn to_named_node(&self) -> NamedNode {
        self.as_named_node().into_owned()
    }

    /// Forgets what the IRI names.
    #[inline]
    pub fn to_resource(&self) -> ResourceIri {
        Iri {
            value: self.value.clone(),
            kind: PhantomData,
        }
    }
}

impl<K> Clone for Iri<K> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            kind: PhantomData,
        }
    }
}

impl<K> PartialEq for Iri<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K> Eq for Iri<K> {}

impl<K> Hash for Iri<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K> PartialOrd for Iri<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Iri<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<K> fmt::Debug for Iri<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.value)
    }
}

impl<K> fmt::Display for Iri<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<K> AsRef<str> for Iri<K> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<K> From<&Iri<K>> for NamedNode {
    fn from(iri: &Iri<K>) -> Self {
        iri.to_named_node()
    }
}

impl<K> From<Iri<K>> for NamedNode {
    fn from(iri: Iri<K>) -> Self {
        Self::new_unchecked(iri.value.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_after_hash_or_slash() {
        assert_eq!(ClassIri::parse("https://ex.org#Widget").unwrap().local_name(), "Widget");
        assert_eq!(
            ClassIri::parse("http://schema.org/Person").unwrap().local_name(),
            "Person"
        );
        assert_eq!(ClassIri::parse("urn:x:y").unwrap().local_name(), "urn:x:y");
    }

    #[test]
    fn equality_is_string_equality() {
        let a = PropertyIri::parse("https://ex.org#name").unwrap();
        let b = PropertyIri::parse(String::from("https://ex.org#name")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_resource().as_str(), b.as_str());
    }

    #[test]
    fn relative_iri_is_rejected() {
        PropertyIri::parse("name").unwrap_err();
    }
}
