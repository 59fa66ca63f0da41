//! Write-once store of the values (randomness, witnesses, responses) produced during one protocol
//! run. Components never reference each other directly; a component that needs a peer's value reads
//! it from the store under the peer's key.

use crate::{constants::KEY_NAMESPACE, error::ProofSystemError};
use ark_std::{collections::BTreeMap, fmt, str::FromStr, string::String, string::ToString};
use num::BigInt;
use qr_group::element::QrElementN;

/// Semantic class of a stored value
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyClass {
    /// First move of the prover, `base^randomness`
    Witness,
    /// Randomness used for a witness
    Randomness,
    /// Third move of the prover, `randomness + challenge * secret`
    Response,
    Secret,
    /// Values the verifier receives in the clear
    Public,
}

impl KeyClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Witness => "witness",
            Self::Randomness => "randomness",
            Self::Response => "response",
            Self::Secret => "secret",
            Self::Public => "public",
        }
    }
}

impl FromStr for KeyClass {
    type Err = ProofSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "witness" => Ok(Self::Witness),
            "randomness" => Ok(Self::Randomness),
            "response" => Ok(Self::Response),
            "secret" => Ok(Self::Secret),
            "public" => Ok(Self::Public),
            _ => Err(ProofSystemError::InvalidStoreKey(s.to_string())),
        }
    }
}

/// Hierarchical key `gs:<component>:<class>:<name>[:<index>]`. The index addresses one of many
/// values of the same name, like the randomness for each vertex base.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreKey {
    component: String,
    class: KeyClass,
    name: String,
    index: Option<usize>,
}

impl StoreKey {
    /// `component` and `name` must pass [`StoreKey::check_segment`] for the key to parse back
    pub fn new(component: &str, class: KeyClass, name: &str) -> Self {
        Self {
            component: component.to_string(),
            class,
            name: name.to_string(),
            index: None,
        }
    }

    pub fn indexed(component: &str, class: KeyClass, name: &str, index: usize) -> Self {
        Self::new(component, class, name).with_index(index)
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Same key without the index
    pub fn unindexed(&self) -> Self {
        Self {
            index: None,
            ..self.clone()
        }
    }

    /// Key segments must be non-empty and free of `:`
    pub fn check_segment(segment: &str) -> Result<(), ProofSystemError> {
        if segment.is_empty() || segment.contains(':') {
            return Err(ProofSystemError::InvalidStoreKey(segment.to_string()));
        }
        Ok(())
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn class(&self) -> KeyClass {
        self.class
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            KEY_NAMESPACE,
            self.component,
            self.class.as_str(),
            self.name
        )?;
        if let Some(i) = self.index {
            write!(f, ":{}", i)?;
        }
        Ok(())
    }
}

impl FromStr for StoreKey {
    type Err = ProofSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProofSystemError::InvalidStoreKey(s.to_string());
        let parts = s.split(':').collect::<ark_std::vec::Vec<_>>();
        if !(parts.len() == 4 || parts.len() == 5) || parts[0] != KEY_NAMESPACE {
            return Err(invalid());
        }
        Self::check_segment(parts[1]).map_err(|_| invalid())?;
        Self::check_segment(parts[3]).map_err(|_| invalid())?;
        let class = KeyClass::from_str(parts[2]).map_err(|_| invalid())?;
        let mut key = Self::new(parts[1], class, parts[3]);
        if parts.len() == 5 {
            key.index = Some(usize::from_str(parts[4]).map_err(|_| invalid())?);
        }
        Ok(key)
    }
}

/// Value held by the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProofObject {
    Integer(BigInt),
    Element(QrElementN),
}

impl From<BigInt> for ProofObject {
    fn from(i: BigInt) -> Self {
        Self::Integer(i)
    }
}

impl From<QrElementN> for ProofObject {
    fn from(e: QrElementN) -> Self {
        Self::Element(e)
    }
}

/// One store per protocol run. Each key can be written once.
#[derive(Clone, Debug, Default)]
pub struct ProofStore {
    objects: BTreeMap<StoreKey, ProofObject>,
}

impl ProofStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if `key` already holds a value
    pub fn store(
        &mut self,
        key: StoreKey,
        value: impl Into<ProofObject>,
    ) -> Result<(), ProofSystemError> {
        if self.objects.contains_key(&key) {
            return Err(ProofSystemError::DuplicateStoreKey(key));
        }
        tracing::trace!(%key, "store");
        self.objects.insert(key, value.into());
        Ok(())
    }

    /// Value that must be present, an error otherwise
    pub fn retrieve(&self, key: &StoreKey) -> Result<&ProofObject, ProofSystemError> {
        self.objects
            .get(key)
            .ok_or_else(|| ProofSystemError::MissingStoreKey(key.clone()))
    }

    pub fn retrieve_integer(&self, key: &StoreKey) -> Result<&BigInt, ProofSystemError> {
        match self.retrieve(key)? {
            ProofObject::Integer(i) => Ok(i),
            _ => Err(ProofSystemError::UnexpectedStoreValue(
                key.clone(),
                "an integer",
            )),
        }
    }

    pub fn retrieve_element(&self, key: &StoreKey) -> Result<&QrElementN, ProofSystemError> {
        match self.retrieve(key)? {
            ProofObject::Element(e) => Ok(e),
            _ => Err(ProofSystemError::UnexpectedStoreValue(
                key.clone(),
                "a group element",
            )),
        }
    }

    /// Value that may be absent
    pub fn get(&self, key: &StoreKey) -> Option<&ProofObject> {
        self.objects.get(key)
    }

    pub fn contains(&self, key: &StoreKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &StoreKey> {
        self.objects.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_format() {
        let k = StoreKey::new("commitment0", KeyClass::Response, "m");
        assert_eq!(k.to_string(), "gs:commitment0:response:m");
        assert_eq!(StoreKey::from_str(&k.to_string()).unwrap(), k);

        let k = StoreKey::indexed("graph", KeyClass::Randomness, "vertex", 17);
        assert_eq!(k.to_string(), "gs:graph:randomness:vertex:17");
        assert_eq!(StoreKey::from_str(&k.to_string()).unwrap(), k);
        assert_eq!(k.index(), Some(17));
        assert_eq!(
            k.unindexed(),
            StoreKey::new("graph", KeyClass::Randomness, "vertex")
        );

        for bad in [
            "",
            "gs:graph:randomness",
            "xx:graph:randomness:vertex",
            "gs::randomness:vertex",
            "gs:graph:tilde:vertex",
            "gs:graph:randomness:vertex:x",
            "gs:graph:randomness:vertex:1:2",
        ] {
            assert!(StoreKey::from_str(bad).is_err(), "{}", bad);
        }
        assert!(StoreKey::check_segment("a:b").is_err());
        assert!(StoreKey::check_segment("").is_err());
        assert!(StoreKey::check_segment("graph").is_ok());
    }

    #[test]
    fn write_once() {
        let mut store = ProofStore::new();
        assert!(store.is_empty());

        let k1 = StoreKey::new("c", KeyClass::Secret, "m");
        let k2 = k1.clone().with_index(1);
        store.store(k1.clone(), BigInt::from(5)).unwrap();
        store.store(k2.clone(), BigInt::from(6)).unwrap();
        assert_eq!(store.len(), 2);

        match store.store(k1.clone(), BigInt::from(7)) {
            Err(ProofSystemError::DuplicateStoreKey(k)) => assert_eq!(k, k1),
            _ => panic!("duplicate write accepted"),
        }
        // Failed write changes nothing
        assert_eq!(store.len(), 2);
        assert_eq!(store.retrieve_integer(&k1).unwrap(), &BigInt::from(5));
        assert_eq!(store.retrieve_integer(&k2).unwrap(), &BigInt::from(6));
    }

    #[test]
    fn missing_and_mistyped() {
        let mut store = ProofStore::new();
        let k = StoreKey::new("c", KeyClass::Response, "r");
        assert!(matches!(
            store.retrieve(&k),
            Err(ProofSystemError::MissingStoreKey(_))
        ));
        assert!(store.get(&k).is_none());
        assert!(!store.contains(&k));

        store.store(k.clone(), BigInt::from(1)).unwrap();
        assert!(store.get(&k).is_some());
        assert!(matches!(
            store.retrieve_element(&k),
            Err(ProofSystemError::UnexpectedStoreValue(_, _))
        ));
    }
}
