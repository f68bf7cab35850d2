use crate::util::*;

/// A scalar value per degree of freedom, tagged with the name used for
/// output series.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    values: DofVector,
}

impl Field {
    pub fn new(name: &str, values: DofVector) -> Self {
        Field {
            name: name.to_string(),
            values,
        }
    }

    pub fn zeros(name: &str, len: usize) -> Self {
        Field::new(name, DofVector::zeros(len))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.len() == 0
    }

    pub fn values(&self) -> &DofVector {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut DofVector {
        &mut self.values
    }

    /// Copy another field's values, keeping this field's name.
    pub fn assign(&mut self, other: &Field) {
        debug_assert_eq!(self.values.len(), other.values.len());
        self.values.copy_from(&other.values);
    }
}
