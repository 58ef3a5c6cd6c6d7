use super::ids::AtomId;

/// A covalent bond between two atoms.
///
/// The `rotatable` flag classifies the bond as a freely rotatable single
/// bond (acyclic, non-terminal); rotatable bonds are the ones the
/// chromosome factory turns into dihedral degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub atom1: AtomId,
    pub atom2: AtomId,
    pub rotatable: bool,
}

impl Bond {
    pub fn new(atom1: AtomId, atom2: AtomId) -> Self {
        Self {
            atom1,
            atom2,
            rotatable: false,
        }
    }

    pub fn rotatable(atom1: AtomId, atom2: AtomId) -> Self {
        Self {
            atom1,
            atom2,
            rotatable: true,
        }
    }

    /// The bond partner of `atom`, or `None` if `atom` is not part of
    /// this bond.
    pub fn partner(&self, atom: AtomId) -> Option<AtomId> {
        if atom == self.atom1 {
            Some(self.atom2)
        } else if atom == self.atom2 {
            Some(self.atom1)
        } else {
            None
        }
    }
}
