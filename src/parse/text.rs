//! Text input: `---`-separated sections with `COMPANY:` / `POSITION:` / `JD:` lines.

use crate::model::JobRecord;

const SECTION_SEPARATOR: &str = "\n---\n";
const FALLBACK_POSITION_LEN: usize = 80;

/// Parse a text document into job records, one per non-empty section.
///
/// Within a section, `COMPANY:` and `POSITION:` lines set those fields and
/// the description starts after the last of them. A `JD:` line ends header
/// scanning; text after the marker on the same line starts the description.
///
/// A section with no `POSITION:` line uses its first line (up to 80
/// characters) as the position and the whole section as the description.
pub fn parse_text(content: &str, default_company: &str) -> Vec<JobRecord> {
    content
        .split(SECTION_SEPARATOR)
        .filter_map(|section| parse_section(section.trim(), default_company))
        .collect()
}

fn parse_section(section: &str, default_company: &str) -> Option<JobRecord> {
    if section.is_empty() {
        return None;
    }

    let lines: Vec<&str> = section.split('\n').collect();
    let mut company = default_company.to_string();
    let mut position = None;
    let mut inline_description = None;
    let mut description_start = 0;

    for (i, line) in lines.iter().enumerate() {
        if let Some(rest) = line.strip_prefix("COMPANY:") {
            company = rest.trim().to_string();
            description_start = i + 1;
        } else if let Some(rest) = line.strip_prefix("POSITION:") {
            position = Some(rest.trim().to_string());
            description_start = i + 1;
        } else if let Some(rest) = line.strip_prefix("JD:") {
            inline_description = Some(rest.trim()).filter(|s| !s.is_empty());
            description_start = i + 1;
            break;
        }
    }

    let (position, description) = match position {
        Some(position) => {
            let mut body: Vec<&str> = inline_description.into_iter().collect();
            body.extend(&lines[description_start..]);
            (position, body.join("\n").trim().to_string())
        }
        None => {
            let first_line: String = lines[0].chars().take(FALLBACK_POSITION_LEN).collect();
            (first_line, section.to_string())
        }
    };

    if description.is_empty() {
        return None;
    }

    Some(JobRecord::new(company, position, description))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::parse::UNKNOWN_COMPANY;

    #[test]
    fn parses_marked_sections() {
        let content = "COMPANY: Acme\nPOSITION: Engineer\nJD:\nBuild rockets.\nTest them.\n---\n\
                       COMPANY: Initech\nPOSITION: Analyst\nJD:\nFill TPS reports.";

        let jobs = parse_text(content, UNKNOWN_COMPANY);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].company, "Acme");
        assert_eq!(jobs[0].position, "Engineer");
        assert_eq!(jobs[0].description, "Build rockets.\nTest them.");
        assert_eq!(jobs[1].company, "Initech");
        assert_eq!(jobs[1].position, "Analyst");
        assert_eq!(jobs[1].description, "Fill TPS reports.");
    }

    #[test]
    fn unmarked_section_uses_first_line_and_whole_text() {
        let long_title = "x".repeat(120);
        let section = format!("{long_title}\nWe need someone great.\nApply now.");

        let jobs = parse_text(&section, UNKNOWN_COMPANY);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].position, "x".repeat(80));
        assert_eq!(jobs[0].description, section);
        assert_eq!(jobs[0].company, UNKNOWN_COMPANY);
    }

    #[test]
    fn section_count_matches_non_empty_sections() {
        let content = "First job\nbody\n---\nSecond job\nbody\n---\n\n---\nThird job\nbody";
        let jobs = parse_text(content, UNKNOWN_COMPANY);

        assert_eq!(jobs.len(), 3);
        let positions: Vec<&str> = jobs.iter().map(|j| j.position.as_str()).collect();
        assert_eq!(positions, ["First job", "Second job", "Third job"]);
    }

    #[test]
    fn description_without_jd_marker_follows_last_header() {
        let content = "POSITION: Engineer\nCOMPANY: Acme\nBuild rockets.";
        let jobs = parse_text(content, UNKNOWN_COMPANY);

        assert_eq!(jobs[0].description, "Build rockets.");
    }

    #[test]
    fn inline_jd_text_starts_description() {
        let content = "POSITION: Engineer\nJD: Build rockets.\nTest them.";
        let jobs = parse_text(content, UNKNOWN_COMPANY);

        assert_eq!(jobs[0].description, "Build rockets.\nTest them.");
    }

    #[test]
    fn lines_after_jd_are_not_treated_as_headers() {
        let content = "POSITION: Engineer\nJD:\nCOMPANY: mentioned in the body";
        let jobs = parse_text(content, "Default Co");

        assert_eq!(jobs[0].company, "Default Co");
        assert_eq!(jobs[0].description, "COMPANY: mentioned in the body");
    }

    #[test]
    fn empty_description_drops_section() {
        let content = "COMPANY: Acme\nPOSITION: Engineer\nJD:\n   \n---\nPOSITION: Analyst\nJD:\nReal text.";
        let jobs = parse_text(content, UNKNOWN_COMPANY);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].position, "Analyst");
    }

    #[test]
    fn position_slashes_are_replaced() {
        let jobs = parse_text("POSITION: Dev/Ops Engineer\nJD:\nRun things.", UNKNOWN_COMPANY);
        assert_eq!(jobs[0].position, "Dev-Ops Engineer");
    }

    #[test]
    fn fallback_position_slashes_are_replaced() {
        let jobs = parse_text("Dev/Ops Engineer\nRun things.", UNKNOWN_COMPANY);
        assert_eq!(jobs[0].position, "Dev-Ops Engineer");
    }
}
