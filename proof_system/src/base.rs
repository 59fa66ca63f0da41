//! Bases of the extended public key and the exponents a graph assigns to them

use crate::error::ProofSystemError;
use ark_std::{collections::BTreeMap, fmt, slice, vec::Vec};
use num::BigInt;
use qr_group::element::QrElementN;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// Role of a base in the public key
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BaseType {
    Vertex,
    Edge,
    /// `R_0`, the base for a committed message
    Base0,
    /// `S`, the base for randomness
    BaseS,
    BaseZ,
    BaseR,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Vertex => "vertex",
            Self::Edge => "edge",
            Self::Base0 => "R_0",
            Self::BaseS => "S",
            Self::BaseZ => "Z",
            Self::BaseR => "R",
        };
        f.write_str(s)
    }
}

/// A base together with the exponent it is raised to. The exponent is unset until it is known and
/// can be set only once.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRepresentation {
    base_index: usize,
    base_type: BaseType,
    base: QrElementN,
    #[serde_as(as = "Option<DisplayFromStr>")]
    exponent: Option<BigInt>,
}

impl BaseRepresentation {
    pub fn new(base: QrElementN, base_index: usize, base_type: BaseType) -> Self {
        Self {
            base_index,
            base_type,
            base,
            exponent: None,
        }
    }

    pub fn base_index(&self) -> usize {
        self.base_index
    }

    pub fn base_type(&self) -> BaseType {
        self.base_type
    }

    pub fn base(&self) -> &QrElementN {
        &self.base
    }

    pub fn exponent(&self) -> Option<&BigInt> {
        self.exponent.as_ref()
    }

    pub fn has_exponent(&self) -> bool {
        self.exponent.is_some()
    }

    pub fn set_exponent(&mut self, exponent: BigInt) -> Result<(), ProofSystemError> {
        if self.has_exponent() {
            return Err(ProofSystemError::BaseExponentAlreadySet(
                self.base_index,
                self.base_type,
            ));
        }
        self.exponent = Some(exponent);
        Ok(())
    }

    /// Copy of this base with the same index, type and element but no exponent
    pub fn without_exponent(&self) -> Self {
        Self::new(self.base.clone(), self.base_index, self.base_type)
    }

    /// `(index, type)` identifies a base within a collection
    pub fn id(&self) -> (usize, BaseType) {
        (self.base_index, self.base_type)
    }
}

/// Ordered bases with no two sharing index and type. The order is the insertion order and is
/// significant as witnesses and challenges are computed over it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BaseRepresentation>", into = "Vec<BaseRepresentation>")]
pub struct BaseCollection {
    bases: Vec<BaseRepresentation>,
    positions: BTreeMap<(usize, BaseType), usize>,
}

impl BaseCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, base: BaseRepresentation) -> Result<(), ProofSystemError> {
        let id = base.id();
        if self.positions.contains_key(&id) {
            return Err(ProofSystemError::DuplicateBase(id.0, id.1));
        }
        self.positions.insert(id, self.bases.len());
        self.bases.push(base);
        Ok(())
    }

    pub fn get(&self, base_index: usize, base_type: BaseType) -> Option<&BaseRepresentation> {
        self.positions
            .get(&(base_index, base_type))
            .map(|p| &self.bases[*p])
    }

    pub fn contains(&self, base_index: usize, base_type: BaseType) -> bool {
        self.positions.contains_key(&(base_index, base_type))
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// All bases in insertion order
    pub fn iter(&self) -> slice::Iter<'_, BaseRepresentation> {
        self.bases.iter()
    }

    /// Bases of type `base_type` only, in insertion order
    pub fn create_iterator(&self, base_type: BaseType) -> BaseIterator<'_> {
        BaseIterator {
            bases: &self.bases,
            base_type,
            position: 0,
        }
    }

    pub fn count(&self, base_type: BaseType) -> usize {
        self.create_iterator(base_type).count()
    }

    /// Unset every exponent
    pub fn forget_exponents(&mut self) {
        for b in self.bases.iter_mut() {
            b.exponent = None;
        }
    }

    /// Copy of this collection with every exponent reset, for handing bases to a party that must
    /// not learn the exponents
    pub fn with_forgotten_exponents(&self) -> Self {
        let mut c = self.clone();
        c.forget_exponents();
        c
    }
}

impl TryFrom<Vec<BaseRepresentation>> for BaseCollection {
    type Error = ProofSystemError;

    fn try_from(bases: Vec<BaseRepresentation>) -> Result<Self, Self::Error> {
        let mut c = Self::new();
        for b in bases {
            c.add(b)?;
        }
        Ok(c)
    }
}

impl From<BaseCollection> for Vec<BaseRepresentation> {
    fn from(c: BaseCollection) -> Self {
        c.bases
    }
}

impl<'a> IntoIterator for &'a BaseCollection {
    type Item = &'a BaseRepresentation;
    type IntoIter = slice::Iter<'a, BaseRepresentation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bases of one type. Finite, and can be restarted with [`BaseIterator::reset`].
#[derive(Clone, Debug)]
pub struct BaseIterator<'a> {
    bases: &'a [BaseRepresentation],
    base_type: BaseType,
    position: usize,
}

impl<'a> BaseIterator<'a> {
    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn base_type(&self) -> BaseType {
        self.base_type
    }
}

impl<'a> Iterator for BaseIterator<'a> {
    type Item = &'a BaseRepresentation;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.bases.len() {
            let b = &self.bases[self.position];
            self.position += 1;
            if b.base_type == self.base_type {
                return Some(b);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::BigUint;
    use qr_group::group::{QrGroup, QrGroupN};

    fn element(v: u32) -> QrElementN {
        let group = QrGroupN::new(BigUint::from(1081u32)).unwrap();
        group.create_element(BigUint::from(v * v)).unwrap()
    }

    fn collection() -> BaseCollection {
        let mut c = BaseCollection::new();
        c.add(BaseRepresentation::new(element(2), 1, BaseType::Vertex))
            .unwrap();
        c.add(BaseRepresentation::new(element(3), 11, BaseType::Edge))
            .unwrap();
        c.add(BaseRepresentation::new(element(4), 2, BaseType::Vertex))
            .unwrap();
        c.add(BaseRepresentation::new(element(5), 0, BaseType::Base0))
            .unwrap();
        c.add(BaseRepresentation::new(element(6), 12, BaseType::Edge))
            .unwrap();
        c
    }

    #[test]
    fn no_duplicates() {
        let mut c = collection();
        assert_eq!(c.len(), 5);
        assert!(matches!(
            c.add(BaseRepresentation::new(element(7), 2, BaseType::Vertex)),
            Err(ProofSystemError::DuplicateBase(2, BaseType::Vertex))
        ));
        // Same index with another type is a different base
        c.add(BaseRepresentation::new(element(7), 2, BaseType::Edge))
            .unwrap();
        assert_eq!(c.len(), 6);
        assert_eq!(c.get(2, BaseType::Edge).unwrap().base(), &element(7));
        assert_eq!(c.get(2, BaseType::Vertex).unwrap().base(), &element(4));
        assert!(c.get(3, BaseType::Vertex).is_none());
    }

    #[test]
    fn typed_iteration() {
        let c = collection();
        let mut it = c.create_iterator(BaseType::Vertex);
        assert_eq!(
            it.by_ref().map(|b| b.base_index()).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(it.next().is_none());
        it.reset();
        assert_eq!(it.next().unwrap().base_index(), 1);

        assert_eq!(
            c.create_iterator(BaseType::Edge)
                .map(|b| b.base_index())
                .collect::<Vec<_>>(),
            vec![11, 12]
        );
        assert_eq!(c.count(BaseType::Base0), 1);
        assert_eq!(c.count(BaseType::BaseS), 0);
        assert_eq!(c.iter().count(), 5);
    }

    #[test]
    fn zero_exponent_is_set_once() {
        let mut b = BaseRepresentation::new(element(2), 4, BaseType::Edge);
        b.set_exponent(BigInt::from(0)).unwrap();
        assert!(b.has_exponent());
        assert_eq!(b.exponent(), Some(&BigInt::from(0)));
        assert!(matches!(
            b.set_exponent(BigInt::from(5)),
            Err(ProofSystemError::BaseExponentAlreadySet(4, BaseType::Edge))
        ));
        assert_eq!(b.exponent(), Some(&BigInt::from(0)));
    }

    #[test]
    fn exponents() {
        let mut b = BaseRepresentation::new(element(2), 1, BaseType::Vertex);
        assert!(!b.has_exponent());
        b.set_exponent(BigInt::from(35)).unwrap();
        assert!(b.has_exponent());
        assert!(matches!(
            b.set_exponent(BigInt::from(36)),
            Err(ProofSystemError::BaseExponentAlreadySet(1, BaseType::Vertex))
        ));
        assert_eq!(b.exponent(), Some(&BigInt::from(35)));
        assert!(!b.without_exponent().has_exponent());

        let mut c = BaseCollection::new();
        c.add(b).unwrap();
        let forgotten = c.with_forgotten_exponents();
        assert!(c.get(1, BaseType::Vertex).unwrap().has_exponent());
        assert!(!forgotten.get(1, BaseType::Vertex).unwrap().has_exponent());
        c.forget_exponents();
        assert_eq!(c, forgotten);
    }

    #[test]
    fn serialization() {
        let mut c = collection();
        let mut b = BaseRepresentation::new(element(8), 3, BaseType::Vertex);
        b.set_exponent(BigInt::from(-77)).unwrap();
        c.add(b).unwrap();

        let ser = serde_json::to_string(&c).unwrap();
        let deser: BaseCollection = serde_json::from_str(&ser).unwrap();
        assert_eq!(deser, c);
        assert_eq!(
            deser.get(3, BaseType::Vertex).unwrap().exponent(),
            Some(&BigInt::from(-77))
        );

        let ser = rmp_serde::to_vec_named(&c).unwrap();
        let deser: BaseCollection = rmp_serde::from_slice(&ser).unwrap();
        assert_eq!(deser, c);

        // A list with a repeated base is not a collection
        let mut list: Vec<BaseRepresentation> = c.into();
        list.push(list[0].clone());
        let ser = serde_json::to_string(&list).unwrap();
        assert!(serde_json::from_str::<BaseCollection>(&ser).is_err());
    }
}
