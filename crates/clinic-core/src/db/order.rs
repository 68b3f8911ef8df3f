//! Allow-listed ordering and page query plans.
//!
//! Callers pick a sort order by string key (`"nome asc"`). The key is looked
//! up in a closed enumeration whose variants map to literal `column DIRECTION`
//! fragments, so no caller text is ever spliced into SQL.

use std::fmt;

use crate::models::Pager;

/// Closed set of sort orders for one entity.
pub trait SortKey: Copy + Eq + fmt::Debug + 'static {
    /// Every allow-listed order.
    const ALL: &'static [Self];
    /// Order used for unrecognised keys.
    const DEFAULT: Self;

    /// Caller-facing key.
    fn key(self) -> &'static str;

    /// Literal SQL fragment.
    fn fragment(self) -> &'static str;

    /// Resolve a caller key, falling back to [`SortKey::DEFAULT`].
    fn resolve(input: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.key() == input)
            .unwrap_or(Self::DEFAULT)
    }
}

macro_rules! sort_keys {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, {
            $($variant:ident => ($key:literal, $fragment:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
        }

        impl SortKey for $name {
            const ALL: &'static [Self] = &[$($name::$variant,)+];
            const DEFAULT: Self = $name::$default;

            fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            fn fragment(self) -> &'static str {
                match self {
                    $($name::$variant => $fragment,)+
                }
            }
        }
    };
}

sort_keys! {
    /// Sort orders accepted by patient listings.
    PatientSort, default = IdDesc, {
        IdAsc => ("id asc", "id ASC"),
        IdDesc => ("id desc", "id DESC"),
        NameAsc => ("nome asc", "name ASC"),
        NameDesc => ("nome desc", "name DESC"),
        BirthDateAsc => ("dtnascimento asc", "birth_date ASC"),
        BirthDateDesc => ("dtnascimento desc", "birth_date DESC"),
        SexAsc => ("sexo asc", "sex ASC"),
        SexDesc => ("sexo desc", "sex DESC"),
        RecordNumberAsc => ("prontuario asc", "record_number ASC"),
        RecordNumberDesc => ("prontuario desc", "record_number DESC"),
        InsurancePlanAsc => ("convenio asc", "insurance_plan ASC"),
        InsurancePlanDesc => ("convenio desc", "insurance_plan DESC"),
    }
}

sort_keys! {
    /// Sort orders accepted by consultation listings.
    ConsultationSort, default = IdDesc, {
        IdAsc => ("id asc", "id ASC"),
        IdDesc => ("id desc", "id DESC"),
        DateAsc => ("data asc", "consulted_on ASC"),
        DateDesc => ("data desc", "consulted_on DESC"),
        DiagnosisCodeAsc => ("cid asc", "diagnosis_code ASC"),
        DiagnosisCodeDesc => ("cid desc", "diagnosis_code DESC"),
        PatientIdAsc => ("pacienteid asc", "patient_id ASC"),
        PatientIdDesc => ("pacienteid desc", "patient_id DESC"),
    }
}

/// Everything a page query needs, ready to bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub limit: i64,
    pub offset: i64,
    /// Resolved `column DIRECTION` fragment
    pub order: &'static str,
    /// Contains-style `LIKE` pattern for the search text
    pub pattern: String,
}

impl QueryPlan {
    pub fn new<K: SortKey>(pager: &Pager) -> Self {
        Self {
            limit: pager.page_size(),
            offset: pager.offset(),
            order: K::resolve(pager.order_by()).fragment(),
            pattern: contains_pattern(pager.search_text()),
        }
    }
}

/// Escape character used in every `LIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Build a `LIKE` pattern matching `text` as a literal substring.
pub fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
