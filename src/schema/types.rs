// src/schema/types.rs

pub const CLIENT_ID: &str = "client_id";
pub const AGE: &str = "age";
pub const JOB: &str = "job";
pub const MARITAL: &str = "marital";
pub const EDUCATION: &str = "education";
pub const CREDIT_DEFAULT: &str = "credit_default";
pub const MORTGAGE: &str = "mortgage";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";
pub const NUMBER_CONTACTS: &str = "number_contacts";
pub const CONTACT_DURATION: &str = "contact_duration";
pub const PREVIOUS_CAMPAIGN_CONTACTS: &str = "previous_campaign_contacts";
pub const PREVIOUS_OUTCOME: &str = "previous_outcome";
pub const CAMPAIGN_OUTCOME: &str = "campaign_outcome";
pub const CONS_PRICE_IDX: &str = "cons_price_idx";
pub const EURIBOR_THREE_MONTHS: &str = "euribor_three_months";

/// Derived from `month` + `day`; never present in the input.
pub const LAST_CONTACT_DATE: &str = "last_contact_date";

/// Every column the input file must carry.
pub const INPUT_COLUMNS: &[&str] = &[
    CLIENT_ID,
    AGE,
    JOB,
    MARITAL,
    EDUCATION,
    CREDIT_DEFAULT,
    MORTGAGE,
    MONTH,
    DAY,
    NUMBER_CONTACTS,
    CONTACT_DURATION,
    PREVIOUS_CAMPAIGN_CONTACTS,
    PREVIOUS_OUTCOME,
    CAMPAIGN_OUTCOME,
    CONS_PRICE_IDX,
    EURIBOR_THREE_MONTHS,
];

/// One output file: a fixed column subset of the transformed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub file_name: &'static str,
    pub columns: &'static [&'static str],
}

pub const CLIENT: TableSpec = TableSpec {
    name: "client",
    file_name: "client.csv",
    columns: &[CLIENT_ID, AGE, JOB, MARITAL, EDUCATION, CREDIT_DEFAULT, MORTGAGE],
};

pub const CAMPAIGN: TableSpec = TableSpec {
    name: "campaign",
    file_name: "campaign.csv",
    columns: &[
        CLIENT_ID,
        NUMBER_CONTACTS,
        CONTACT_DURATION,
        PREVIOUS_CAMPAIGN_CONTACTS,
        PREVIOUS_OUTCOME,
        CAMPAIGN_OUTCOME,
        LAST_CONTACT_DATE,
    ],
};

pub const ECONOMICS: TableSpec = TableSpec {
    name: "economics",
    file_name: "economics.csv",
    columns: &[CLIENT_ID, CONS_PRICE_IDX, EURIBOR_THREE_MONTHS],
};

/// Output tables in write order.
pub const OUTPUT_TABLES: [TableSpec; 3] = [CLIENT, CAMPAIGN, ECONOMICS];
