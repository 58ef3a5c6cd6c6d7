use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for an atom within a `MolecularModel`.
    pub struct AtomId;
}
