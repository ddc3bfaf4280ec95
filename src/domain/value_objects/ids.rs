use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! numeric_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(value: i64) -> Result<Self, String> {
                if value <= 0 {
                    return Err(format!("{} must be positive, got {value}", $label));
                }
                Ok(Self(value))
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(AssignmentId, "assignment id");
numeric_id!(CourseId, "course id");
numeric_id!(UserId, "user id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_ids() {
        assert!(AssignmentId::new(0).is_err());
        assert!(UserId::new(-3).is_err());
        assert_eq!(CourseId::new(12).unwrap().as_i64(), 12);
    }
}
