use std::sync::OnceLock;

use regex::Regex;

use crate::error::StructuralMismatch;
use crate::scraper::RawFragment;

pub const FIELDS_PER_RECORD: usize = 5;

pub const REPORT_HEADERS: [&str; FIELDS_PER_RECORD] = [
    "Resort Name",
    "72 Hour Snowfall",
    "Base Depth",
    "Trails open",
    "Open lifts",
];

/// Words the site appends to resort names that the metadata table leaves out.
const NAME_BOILERPLATE: [&str; 3] = ["Ski Area", "Resort", "Mountain"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResortRecord {
    pub name: String,
    pub snowfall: String,
    pub base_depth: String,
    pub trails_open: String,
    pub open_lifts: String,
}

impl ResortRecord {
    pub fn fields(&self) -> [&str; FIELDS_PER_RECORD] {
        [
            self.name.as_str(),
            self.snowfall.as_str(),
            self.base_depth.as_str(),
            self.trails_open.as_str(),
            self.open_lifts.as_str(),
        ]
    }

    pub fn cleaned(&self) -> Self {
        Self {
            name: clean_name(&self.name),
            snowfall: strip_dashes(&self.snowfall),
            base_depth: self.base_depth.clone(),
            trails_open: strip_trail_total(&self.trails_open),
            open_lifts: strip_dashes(&self.open_lifts),
        }
    }
}

/// Groups fragments five at a time in page order and cleans each group.
///
/// The page is assumed to emit name, snowfall, depth, trails and lifts for every
/// resort. A leftover partial group means that assumption broke, so it is reported
/// rather than dropped.
pub fn reshape(fragments: &[RawFragment]) -> Result<Vec<ResortRecord>, StructuralMismatch> {
    let remainder = fragments.len() % FIELDS_PER_RECORD;
    if remainder != 0 {
        return Err(StructuralMismatch::IncompleteRecord {
            fragments: fragments.len(),
            remainder,
        });
    }

    let records = fragments
        .chunks_exact(FIELDS_PER_RECORD)
        .map(|group| {
            ResortRecord {
                name: group[0].clone(),
                snowfall: group[1].clone(),
                base_depth: group[2].clone(),
                trails_open: group[3].clone(),
                open_lifts: group[4].clone(),
            }
            .cleaned()
        })
        .collect();

    Ok(records)
}

fn strip_dashes(value: &str) -> String {
    value.replace('-', "")
}

fn strip_trail_total(value: &str) -> String {
    static TRAIL_TOTAL: OnceLock<Regex> = OnceLock::new();
    let re = TRAIL_TOTAL.get_or_init(|| Regex::new(r"/\d+.*").expect("trail total pattern"));

    re.replace_all(value, "").into_owned()
}

fn clean_name(value: &str) -> String {
    let mut name = value.to_owned();
    // Removing one word can splice another back together ("ResResortort").
    while NAME_BOILERPLATE.iter().any(|word| name.contains(word)) {
        for word in NAME_BOILERPLATE {
            name = name.replace(word, "");
        }
    }
    name.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(values: &[&str]) -> Vec<RawFragment> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn strips_boilerplate_from_every_field() {
        let input = fragments(&["Mountain Resort Ski Area", "-3\"", "45\"", "10/20", "-5"]);

        let records = reshape(&input).unwrap();

        assert_eq!(
            records,
            vec![ResortRecord {
                name: String::new(),
                snowfall: "3\"".to_owned(),
                base_depth: "45\"".to_owned(),
                trails_open: "10".to_owned(),
                open_lifts: "5".to_owned(),
            }]
        );
    }

    #[test]
    fn groups_in_page_order() {
        let input = fragments(&[
            "Alta Ski Area", "4\"", "60\"", "110/118", "9/10",
            "Big Sky Resort", "-", "52\"", "200/317 trails", "30",
            "Copper Mountain", "1\"", "38\"", "90/150", "-",
        ]);

        let records = reshape(&input).unwrap();

        assert_eq!(records.len(), input.len() / FIELDS_PER_RECORD);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alta", "Big Sky", "Copper"]);
        assert_eq!(records[1].fields(), ["Big Sky", "", "52\"", "200", "30"]);
        assert_eq!(records[2].open_lifts, "");
        // lifts are only de-dashed, the total survives
        assert_eq!(records[0].open_lifts, "9/10");
    }

    #[test]
    fn empty_input_gives_no_records() {
        assert!(reshape(&[]).unwrap().is_empty());
    }

    #[test]
    fn partial_group_is_an_error() {
        let input = fragments(&["Alta", "1\"", "2\"", "3/4", "5", "Snowbird", "6\""]);

        assert_eq!(
            reshape(&input),
            Err(StructuralMismatch::IncompleteRecord {
                fragments: 7,
                remainder: 2
            })
        );
    }

    #[test]
    fn cleanup_is_idempotent() {
        let input = fragments(&[
            "ResResortort Mountain Ski Area", "--1-\"", "30\"", "12/40/50", "-7-",
            " Sugar Mountain Resort ", "0\"", "18\"", "4/9\n2/3", "--",
        ]);

        for record in reshape(&input).unwrap() {
            assert_eq!(record.cleaned(), record);
        }
    }
}
