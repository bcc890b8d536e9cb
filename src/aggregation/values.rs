use bson::{Bson, Document};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Sub;

/// Numeric type for coercion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int32(i32),
    Int64(i64),
    Double(f64),
}

impl Numeric {
    pub fn as_f64(&self) -> f64 {
        match self {
            Numeric::Int32(n) => *n as f64,
            Numeric::Int64(n) => *n as f64,
            Numeric::Double(n) => *n,
        }
    }

    /// Integral view; `None` for doubles.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Numeric::Int32(n) => Some(*n as i64),
            Numeric::Int64(n) => Some(*n),
            Numeric::Double(_) => None,
        }
    }
}

impl Sub for Numeric {
    type Output = Numeric;

    fn sub(self, rhs: Numeric) -> Numeric {
        match (self.as_i64(), rhs.as_i64()) {
            (Some(a), Some(b)) => match a.checked_sub(b) {
                Some(n) => Numeric::Int64(n),
                None => Numeric::Double(a as f64 - b as f64),
            },
            _ => Numeric::Double(self.as_f64() - rhs.as_f64()),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int32(n) => write!(f, "{n}"),
            Numeric::Int64(n) => write!(f, "{n}"),
            Numeric::Double(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Numeric::Int32(n) => serializer.serialize_i32(*n),
            Numeric::Int64(n) => serializer.serialize_i64(*n),
            Numeric::Double(n) => serializer.serialize_f64(*n),
        }
    }
}

/// Coerce a BSON value to a numeric type
pub fn coerce_numeric(val: &Bson) -> Option<Numeric> {
    match val {
        Bson::Int32(n) => Some(Numeric::Int32(*n)),
        Bson::Int64(n) => Some(Numeric::Int64(*n)),
        Bson::Double(n) => Some(Numeric::Double(*n)),
        _ => None,
    }
}

/// Resolve a dotted path such as `_id.year`.
pub fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut cur = doc.get(parts.next()?)?;
    for part in parts {
        cur = cur.as_document()?.get(part)?;
    }
    Some(cur)
}

/// Short BSON type name used in decode errors.
pub fn type_name(val: &Bson) -> &'static str {
    match val {
        Bson::Null => "null",
        Bson::Int32(_) => "int",
        Bson::Int64(_) => "long",
        Bson::Double(_) => "double",
        Bson::Decimal128(_) => "decimal",
        Bson::String(_) => "string",
        Bson::Document(_) => "object",
        Bson::Array(_) => "array",
        Bson::Boolean(_) => "bool",
        Bson::DateTime(_) => "date",
        Bson::ObjectId(_) => "objectId",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn subtraction_stays_integral() {
        let net = Numeric::Int32(500) - Numeric::Int64(120);
        assert_eq!(net, Numeric::Int64(380));
        assert_eq!(net.to_string(), "380");
    }

    #[test]
    fn subtraction_with_double_widens() {
        let net = Numeric::Double(10.5) - Numeric::Int32(3);
        assert_eq!(net, Numeric::Double(7.5));
        assert_eq!(net.to_string(), "7.5");
    }

    #[test]
    fn whole_doubles_print_without_fraction() {
        assert_eq!(Numeric::Double(250.0).to_string(), "250");
    }

    #[test]
    fn dotted_path_lookup() {
        let d = doc! {"_id": {"year": 2023i32, "month": 9i32}};
        assert_eq!(get_path(&d, "_id.year"), Some(&Bson::Int32(2023)));
        assert_eq!(get_path(&d, "_id.day"), None);
        assert_eq!(get_path(&d, "missing"), None);
    }

    #[test]
    fn non_numbers_do_not_coerce() {
        assert!(coerce_numeric(&Bson::String("12".into())).is_none());
        assert!(coerce_numeric(&Bson::Null).is_none());
    }
}
