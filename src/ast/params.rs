//! Parameter handling for prepared statements
//!
//! Values bound into a statement are carried in the AST as
//! [`Expr::Bound`](super::Expr::Bound). When a statement is rendered in
//! parameterized mode the renderer pushes each one into a [`ParamCollector`]
//! in text order and writes the dialect's placeholder in its place.

/// A scalar value bound into a statement
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        Self::Integer(n as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// A collected parameter with its 1-indexed position
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub index: usize,
    pub value: ParamValue,
}

/// Collects parameters in placeholder order
#[derive(Debug, Default)]
pub struct ParamCollector {
    params: Vec<Param>,
}

impl ParamCollector {
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter and return its 1-indexed position
    pub fn add(&mut self, value: ParamValue) -> usize {
        let index = self.params.len() + 1;
        self.params.push(Param { index, value });
        index
    }

    pub fn into_params(self) -> Vec<Param> {
        self.params
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_collector() {
        let mut collector = ParamCollector::new();

        assert_eq!(collector.add(ParamValue::String("hello".into())), 1);
        assert_eq!(collector.add(ParamValue::Integer(42)), 2);
        assert_eq!(collector.len(), 2);

        let params = collector.into_params();
        assert_eq!(params[0].index, 1);
        assert!(matches!(params[1].value, ParamValue::Integer(42)));
    }

    #[test]
    fn test_param_value_from() {
        let _: ParamValue = true.into();
        let _: ParamValue = "hello".into();
        let _: ParamValue = 42i32.into();
        let _: ParamValue = 42i64.into();
        let _: ParamValue = 2.5f64.into();
        assert!(ParamValue::from(None::<i32>).is_null());
        assert_eq!(ParamValue::from(Some(7i32)), ParamValue::Integer(7));
    }
}
