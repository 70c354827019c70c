use std::fmt;

/// Typed columns every dataset must carry. Column names in the file are
/// configurable (see `ColumnsConfig`); this enum is the stable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Category,
    Teacher,
    Building,
    Date,
    StartTime,
    EndTime,
}

impl Field {
    /// All required fields, in the order they are validated at load.
    pub const ALL: [Field; 6] = [
        Field::Category,
        Field::Teacher,
        Field::Building,
        Field::Date,
        Field::StartTime,
        Field::EndTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Teacher => "teacher",
            Self::Building => "building",
            Self::Date => "date",
            Self::StartTime => "start_time",
            Self::EndTime => "end_time",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
