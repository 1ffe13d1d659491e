//! Application-wide constants and configuration values
//!
//! Centralizes the fixed points schedule, score sheet dimensions and the
//! token tables used to bucket categories for the results report.

/// Points awarded per podium position in the results standings
pub mod points {
    /// Points for a 1st place
    pub const GOLD: u32 = 7;

    /// Points for a 2nd place
    pub const SILVER: u32 = 4;

    /// Points for a 3rd place
    pub const BRONZE: u32 = 2;
}

/// Judged (forms) category score sheet dimensions
pub mod judging {
    /// Number of judge score slots per athlete
    pub const JUDGES_PER_ATHLETE: usize = 5;

    /// Maximum number of names on a category's commission
    pub const COMMISSION_SIZE: usize = 10;
}

/// Category name tokens used to derive the display bucket
pub mod buckets {
    /// Age-band keywords, matched case-insensitively against category name tokens.
    /// Each entry maps a set of accepted tokens to the label shown in reports.
    pub const AGE_BANDS: &[(&[&str], &str)] = &[
        (&["pulcini", "pulcino"], "Pulcini"),
        (&["bambini", "bambino"], "Bambini"),
        (&["fanciulli", "fanciullo"], "Fanciulli"),
        (&["ragazzi", "ragazzo"], "Ragazzi"),
        (&["speranze", "speranza"], "Speranze"),
        (&["cadetti", "cadetto"], "Cadetti"),
        (&["juniores", "junior", "juniors"], "Juniores"),
        (&["seniores", "senior", "seniors"], "Seniores"),
        (&["master", "veterani", "veterano"], "Master"),
    ];

    /// Sub-tier tokens appended to the age band when present (black / coloured belts)
    pub const LEVEL_TOKENS: &[&str] = &["CN", "CB"];

    /// Bucket label used when no age-band keyword matches
    pub const OPEN_BUCKET: &str = "Assoluti";
}

/// Persistence file names
pub mod storage {
    /// Application directory name under the platform config dir
    pub const APP_DIR: &str = "tabellone";

    /// Default SQLite database file name
    pub const DATABASE_FILE: &str = "tabellone.sqlite";

    /// Default category catalog file name
    pub const CATALOG_FILE: &str = "catalog.json";

    /// Default log file name
    pub const LOG_FILE: &str = "tabellone.log";
}

/// Environment variable names that override the config file
pub mod env_vars {
    pub const DATABASE: &str = "TABELLONE_DATABASE";
    pub const CATALOG: &str = "TABELLONE_CATALOG";
    pub const LOG_FILE: &str = "TABELLONE_LOG_FILE";
}
