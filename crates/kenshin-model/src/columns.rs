// SPDX-License-Identifier: Apache-2.0

//! Canonical CSV column names and the category layout of a checkup record.
//! Header matching is case-sensitive against these exact strings.

pub const ID: &str = "ID";
pub const BMI: &str = "BMI";
pub const S_BP: &str = "sBP";
pub const D_BP: &str = "dBP";
pub const BS: &str = "BS";
pub const HBA1C: &str = "HbA1c";
pub const LDL: &str = "LDL";
pub const TG: &str = "TG";
pub const AST: &str = "AST";
pub const ALT: &str = "ALT";
pub const GTP: &str = "GTP";

/// Numeric measurement columns in fixed validation order.
pub const NUMERIC: [&str; 10] = [BMI, S_BP, D_BP, BS, HBA1C, LDL, TG, AST, ALT, GTP];

/// Full required header set, identifier first.
pub const REQUIRED: [&str; 11] = [ID, BMI, S_BP, D_BP, BS, HBA1C, LDL, TG, AST, ALT, GTP];

pub const CATEGORY_BMI: &str = "bmi";
pub const CATEGORY_BLOOD_PRESSURE: &str = "blood_pressure";
pub const CATEGORY_BLOOD_SUGAR: &str = "blood_sugar";
pub const CATEGORY_LIPID: &str = "lipid";
pub const CATEGORY_LIVER: &str = "liver";

/// The five scoring categories and the measurement columns each one covers.
pub const CATEGORIES: [(&str, &[&str]); 5] = [
    (CATEGORY_BMI, &[BMI]),
    (CATEGORY_BLOOD_PRESSURE, &[S_BP, D_BP]),
    (CATEGORY_BLOOD_SUGAR, &[BS, HBA1C]),
    (CATEGORY_LIPID, &[LDL, TG]),
    (CATEGORY_LIVER, &[AST, ALT, GTP]),
];
