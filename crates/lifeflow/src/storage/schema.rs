//! `SQLite` schema definitions for the donor store.

/// SQL statement to create the donors table.
pub const CREATE_DONORS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS donors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    full_name TEXT NOT NULL,
    blood_group TEXT NOT NULL
        CHECK (blood_group IN ('A+', 'A-', 'B+', 'B-', 'AB+', 'AB-', 'O+', 'O-')),
    mobile_number TEXT NOT NULL,
    district TEXT NOT NULL,
    last_donation_date TEXT,
    has_whatsapp INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
)
";

/// Index serving the two-column equality search.
pub const CREATE_LOOKUP_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_donors_lookup ON donors(blood_group, district)
";

/// Index serving newest-first ordering.
pub const CREATE_CREATED_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_donors_created ON donors(created_at DESC)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_DONORS_TABLE,
    CREATE_LOOKUP_INDEX,
    CREATE_CREATED_INDEX,
];
