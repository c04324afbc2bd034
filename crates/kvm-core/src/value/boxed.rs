//! Boxed Values
//!
//! A single tagged union covering all nine element kinds. This is what the
//! accessor takes for stores and hands back for loads.

use std::fmt;
use std::str::FromStr;

use super::kind::ElementKind;
use super::reference::ObjRef;

/// A value of exactly one element kind.
///
/// Equality is bitwise for `Float` and `Double`: NaN equals itself and
/// `-0.0` differs from `0.0`, so a stored value always compares equal to
/// what is loaded back.
#[derive(Debug, Clone, Copy)]
pub enum BoxedValue {
    Bool(bool),
    Byte(i8),
    /// UTF-16 code unit
    Char(u16),
    Double(f64),
    Float(f32),
    Int(i32),
    Long(i64),
    Short(i16),
    /// `None` is the null reference
    Reference(Option<ObjRef>),
}

impl BoxedValue {
    /// The null reference
    pub const NULL: BoxedValue = BoxedValue::Reference(None);

    /// The value a freshly allocated element of `kind` holds
    pub fn zero(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Bool => BoxedValue::Bool(false),
            ElementKind::Byte => BoxedValue::Byte(0),
            ElementKind::Char => BoxedValue::Char(0),
            ElementKind::Double => BoxedValue::Double(0.0),
            ElementKind::Float => BoxedValue::Float(0.0),
            ElementKind::Int => BoxedValue::Int(0),
            ElementKind::Long => BoxedValue::Long(0),
            ElementKind::Short => BoxedValue::Short(0),
            ElementKind::Reference => BoxedValue::NULL,
        }
    }

    /// Kind tag carried by this value
    pub fn kind(&self) -> ElementKind {
        match self {
            BoxedValue::Bool(_) => ElementKind::Bool,
            BoxedValue::Byte(_) => ElementKind::Byte,
            BoxedValue::Char(_) => ElementKind::Char,
            BoxedValue::Double(_) => ElementKind::Double,
            BoxedValue::Float(_) => ElementKind::Float,
            BoxedValue::Int(_) => ElementKind::Int,
            BoxedValue::Long(_) => ElementKind::Long,
            BoxedValue::Short(_) => ElementKind::Short,
            BoxedValue::Reference(_) => ElementKind::Reference,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, BoxedValue::Reference(None))
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            BoxedValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Reference payload; `Some(None)` is a null reference
    pub fn as_reference(&self) -> Option<Option<ObjRef>> {
        match self {
            BoxedValue::Reference(r) => Some(*r),
            _ => None,
        }
    }
}

impl PartialEq for BoxedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BoxedValue::Bool(a), BoxedValue::Bool(b)) => a == b,
            (BoxedValue::Byte(a), BoxedValue::Byte(b)) => a == b,
            (BoxedValue::Char(a), BoxedValue::Char(b)) => a == b,
            (BoxedValue::Double(a), BoxedValue::Double(b)) => a.to_bits() == b.to_bits(),
            (BoxedValue::Float(a), BoxedValue::Float(b)) => a.to_bits() == b.to_bits(),
            (BoxedValue::Int(a), BoxedValue::Int(b)) => a == b,
            (BoxedValue::Long(a), BoxedValue::Long(b)) => a == b,
            (BoxedValue::Short(a), BoxedValue::Short(b)) => a == b,
            (BoxedValue::Reference(a), BoxedValue::Reference(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for BoxedValue {}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for BoxedValue {
                fn from(v: $ty) -> Self {
                    BoxedValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    i8 => Byte,
    u16 => Char,
    f64 => Double,
    f32 => Float,
    i32 => Int,
    i64 => Long,
    i16 => Short,
}

impl From<ObjRef> for BoxedValue {
    fn from(r: ObjRef) -> Self {
        BoxedValue::Reference(Some(r))
    }
}

impl fmt::Display for BoxedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxedValue::Bool(v) => write!(f, "bool:{}", v),
            BoxedValue::Byte(v) => write!(f, "byte:{}", v),
            BoxedValue::Char(v) => match char::from_u32(u32::from(*v)) {
                // `#` would start a comment in a listing
                Some(c) if (c.is_ascii_graphic() || c == ' ') && c != '#' => write!(f, "char:'{}'", c),
                _ => write!(f, "char:{}", v),
            },
            BoxedValue::Double(v) => write!(f, "double:{:?}", v),
            BoxedValue::Float(v) => write!(f, "float:{:?}", v),
            BoxedValue::Int(v) => write!(f, "int:{}", v),
            BoxedValue::Long(v) => write!(f, "long:{}", v),
            BoxedValue::Short(v) => write!(f, "short:{}", v),
            BoxedValue::Reference(Some(r)) => write!(f, "ref:{}", r),
            BoxedValue::Reference(None) => f.write_str("null"),
        }
    }
}

impl FromStr for BoxedValue {
    type Err = String;

    /// Parse the literal form produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "null" {
            return Ok(BoxedValue::NULL);
        }
        let (tag, body) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <kind>:<value>, got `{}`", s))?;
        let bad = |e: &dyn fmt::Display| format!("bad {} literal `{}`: {}", tag, body, e);

        let value = match tag {
            "bool" => BoxedValue::Bool(body.parse::<bool>().map_err(|e| bad(&e))?),
            "byte" => BoxedValue::Byte(body.parse::<i8>().map_err(|e| bad(&e))?),
            "char" => BoxedValue::Char(parse_char(body).ok_or_else(|| bad(&"not a UTF-16 unit"))?),
            "double" => BoxedValue::Double(body.parse::<f64>().map_err(|e| bad(&e))?),
            "float" => BoxedValue::Float(body.parse::<f32>().map_err(|e| bad(&e))?),
            "int" => BoxedValue::Int(body.parse::<i32>().map_err(|e| bad(&e))?),
            "long" => BoxedValue::Long(body.parse::<i64>().map_err(|e| bad(&e))?),
            "short" => BoxedValue::Short(body.parse::<i16>().map_err(|e| bad(&e))?),
            "ref" => {
                let id = body
                    .strip_prefix('@')
                    .ok_or_else(|| bad(&"expected @<id>"))?
                    .parse::<u32>()
                    .map_err(|e| bad(&e))?;
                if id == 0 {
                    return Err(bad(&"handle ids start at 1"));
                }
                BoxedValue::Reference(Some(ObjRef(id)))
            }
            other => return Err(format!("unknown kind `{}`", other)),
        };
        Ok(value)
    }
}

fn parse_char(body: &str) -> Option<u16> {
    if let Some(quoted) = body.strip_prefix('\'').and_then(|b| b.strip_suffix('\'')) {
        let mut chars = quoted.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        return u16::try_from(u32::from(c)).ok();
    }
    body.parse().ok()
}
