//! Parameter schema and individual types.
//!
//! An [`Individual`] pairs a set of [`Parameters`] with an optional cached
//! fitness. The fitness lives beside the parameters rather than inside them,
//! so fitness handlers and creation hooks only ever see schema fields.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Ordered set of distinct parameter names shared by every individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Schema {
    names: Vec<String>,
}

impl Schema {
    /// Build a schema, rejecting empty or duplicated names.
    pub fn new<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ConfigError::EmptySchema);
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ConfigError::DuplicateParameter(name.clone()));
            }
        }
        Ok(Self { names })
    }

    /// Parameter names in schema order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name at position `index` in schema order.
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    /// Check that `parameters` carries exactly the schema's fields.
    pub fn matches(&self, parameters: &Parameters) -> bool {
        parameters.len() == self.names.len()
            && self.names.iter().all(|n| parameters.contains(n))
    }
}

impl TryFrom<Vec<String>> for Schema {
    type Error = ConfigError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<Schema> for Vec<String> {
    fn from(schema: Schema) -> Self {
        schema.names
    }
}

/// Mapping from parameter name to value in `[0.0, 1.0)`.
///
/// The key set is fixed once built: [`Parameters::set`] and
/// [`Parameters::get_mut`] only touch existing fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: BTreeMap<String, f64>,
}

impl Parameters {
    pub(crate) fn from_values(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }

    /// Value of the named parameter.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Mutable access to an existing parameter.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut f64> {
        self.values.get_mut(name)
    }

    /// Overwrite an existing parameter, returning its previous value.
    ///
    /// Unknown names are ignored and yield `None`.
    pub fn set(&mut self, name: &str, value: f64) -> Option<f64> {
        self.values
            .get_mut(name)
            .map(|slot| std::mem::replace(slot, value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Index<&str> for Parameters {
    type Output = f64;

    fn index(&self, name: &str) -> &f64 {
        &self.values[name]
    }
}

/// One candidate solution: parameter values plus last computed fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Schema field values.
    pub parameters: Parameters,
    /// Fitness from the most recent evaluation pass, if any.
    #[serde(default)]
    pub fitness: Option<f64>,
}

impl Individual {
    /// Create an unevaluated individual.
    pub fn new(parameters: Parameters) -> Self {
        Self {
            parameters,
            fitness: None,
        }
    }

    /// Copy the parameters without any cached fitness.
    pub fn stripped(&self) -> Self {
        Self::new(self.parameters.clone())
    }

    /// Value of the named parameter.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.parameters.get(name)
    }
}

impl Index<&str> for Individual {
    type Output = f64;

    fn index(&self, name: &str) -> &f64 {
        &self.parameters[name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, f64)]) -> Parameters {
        Parameters::from_values(pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect())
    }

    #[test]
    fn test_schema_rejects_empty() {
        let names: Vec<String> = Vec::new();
        assert!(matches!(Schema::new(names), Err(ConfigError::EmptySchema)));
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let err = Schema::new(["x", "y", "x"]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateParameter(ref n) if n == "x"));
    }

    #[test]
    fn test_schema_keeps_order() {
        let schema = Schema::new(["b", "a", "c"]).unwrap();
        assert_eq!(schema.names(), &["b", "a", "c"]);
        assert_eq!(schema.name(1), "a");
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_schema_matches() {
        let schema = Schema::new(["x", "y"]).unwrap();
        assert!(schema.matches(&params(&[("x", 0.1), ("y", 0.2)])));
        assert!(!schema.matches(&params(&[("x", 0.1)])));
        assert!(!schema.matches(&params(&[("x", 0.1), ("y", 0.2), ("z", 0.3)])));
    }

    #[test]
    fn test_set_ignores_unknown_names() {
        let mut p = params(&[("x", 0.25)]);
        assert_eq!(p.set("x", 0.5), Some(0.25));
        assert_eq!(p.set("nope", 0.5), None);
        assert_eq!(p.len(), 1);
        assert_eq!(p["x"], 0.5);
    }

    #[test]
    fn test_stripped_drops_fitness() {
        let mut individual = Individual::new(params(&[("x", 0.25)]));
        individual.fitness = Some(3.0);

        let copy = individual.stripped();
        assert_eq!(copy.fitness, None);
        assert_eq!(copy.parameters, individual.parameters);
    }

    #[test]
    fn test_schema_serde() {
        let schema: Schema = serde_json::from_str(r#"["x","y"]"#).unwrap();
        assert_eq!(schema.names(), &["x", "y"]);
        assert!(serde_json::from_str::<Schema>(r#"["x","x"]"#).is_err());
    }
}
