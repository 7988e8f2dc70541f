//! ---
//! ava_section: "02-wire-data-model"
//! ava_subsection: "module"
//! ava_type: "source"
//! ava_scope: "code"
//! ava_description: "Telemetry wire formats and framing."
//! ava_version: "v0.0.0-prealpha"
//! ava_owner: "tbd"
//! ---
/// Sensor values captured together in one tick.
///
/// Ids and values are parallel lists. The lists are kept as supplied so
/// that operator input with mismatched lengths can still be represented;
/// [`crate::encode_bundle`] rejects such readings before anything is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reading {
    pub ids: Vec<u32>,
    pub values: Vec<i64>,
}

impl Reading {
    pub fn new(ids: Vec<u32>, values: Vec<i64>) -> Self {
        Self { ids, values }
    }

    /// Build a reading from `(sensor_id, value)` pairs; always consistent.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, i64)>,
    {
        let (ids, values): (Vec<u32>, Vec<i64>) = pairs.into_iter().unzip();
        Self { ids, values }
    }

    pub fn is_consistent(&self) -> bool {
        self.ids.len() == self.values.len()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (u32, i64)> + '_ {
        self.ids.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_keeps_order() {
        let reading = Reading::from_pairs([(3, 30), (1, 10), (192, 1500)]);
        assert_eq!(reading.ids, vec![3, 1, 192]);
        assert_eq!(reading.values, vec![30, 10, 1500]);
        assert!(reading.is_consistent());
        assert_eq!(reading.pairs().last(), Some((192, 1500)));
    }

    #[test]
    fn mismatched_lists_are_representable() {
        let reading = Reading::new(vec![1, 2], vec![5]);
        assert!(!reading.is_consistent());
        assert_eq!(reading.len(), 2);
    }
}
