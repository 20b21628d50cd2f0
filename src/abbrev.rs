//! Short forms of company and position names for destination filenames.
//!
//! `Google` + `Data Scientist (AI-ML)` becomes `GOOG - DS-AIML`.

/// Abbreviate a company name.
///
/// Known companies use a fixed ticker-like form. Otherwise a name of at most
/// four characters is upper-cased, a multi-word name takes the initials of
/// its first four words, and a single word takes its first three characters.
pub fn abbreviate_company(company: &str) -> String {
    if let Some(known) = known_company(&company.trim().to_lowercase()) {
        return known.to_string();
    }

    if company.chars().count() <= 4 {
        return company.to_uppercase();
    }

    let words: Vec<&str> = split_words(company).collect();
    if words.len() >= 2 {
        words.iter().take(4).filter_map(|w| initial(w)).collect()
    } else {
        company.chars().take(3).collect::<String>().to_uppercase()
    }
}

/// Abbreviate a position title.
///
/// Each word maps through the word table, or to its upper-cased initial.
/// Words that map to an empty form (`co-op`) are dropped. A parenthetical
/// qualifier is abbreviated the same way and appended after a hyphen.
pub fn abbreviate_position(position: &str) -> String {
    let (main, qualifier) = split_qualifier(position);

    let main = abbreviate_words(&main.to_lowercase());
    let suffix = qualifier
        .map(|q| abbreviate_words(&q.to_lowercase()))
        .filter(|s| !s.is_empty())
        .map(|s| format!("-{s}"))
        .unwrap_or_default();

    main + &suffix
}

/// Separate the first `(...)` group from the rest of the title.
///
/// Every parenthetical group and the whitespace before it is removed from
/// the main part; only the first group's content is returned.
fn split_qualifier(position: &str) -> (String, Option<&str>) {
    let mut main = String::with_capacity(position.len());
    let mut qualifier = None;
    let mut rest = position;

    while let Some(open) = rest.find('(') {
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find(')') else {
            break;
        };
        let content = &after_open[..close];
        if content.is_empty() {
            main.push_str(&rest[..open + 2]);
            rest = &after_open[close + 1..];
            continue;
        }

        main.push_str(rest[..open].trim_end());
        if qualifier.is_none() {
            qualifier = Some(content);
        }
        rest = &after_open[close + 1..];
    }
    main.push_str(rest);

    (main, qualifier)
}

/// Abbreviate already-lowercased text word by word.
///
/// A whitespace-separated token is looked up whole first, so hyphenated
/// table entries like `co-op` match; otherwise it is split on hyphens.
fn abbreviate_words(text: &str) -> String {
    let mut out = String::new();
    for token in text.split_whitespace() {
        if let Some(abbr) = known_word(token) {
            out.push_str(abbr);
            continue;
        }
        for word in token.split('-').filter(|w| !w.is_empty()) {
            match known_word(word) {
                Some(abbr) => out.push_str(abbr),
                None => out.extend(initial(word)),
            }
        }
    }
    out
}

fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty())
}

fn initial(word: &str) -> Option<String> {
    word.chars().next().map(|c| c.to_uppercase().collect())
}

fn known_company(name: &str) -> Option<&'static str> {
    let abbr = match name {
        "equifax" => "EQF",
        "fgf brands" => "FGF",
        "geotab" => "GEO",
        "ibm" => "IBM",
        "nokia" => "NOK",
        "orsc" => "ORSC",
        "rbc" => "RBC",
        "rbcx" => "RBCx",
        "shoppers drug mart" => "SDM",
        "google" => "GOOG",
        "microsoft" => "MSFT",
        "amazon" => "AMZN",
        "apple" => "AAPL",
        "meta" => "META",
        "tesla" => "TSLA",
        "netflix" => "NFLX",
        "uber" => "UBER",
        "airbnb" => "ABNB",
        "spotify" => "SPOT",
        "shopify" => "SHOP",
        "td bank" => "TD",
        "bmo" => "BMO",
        "scotiabank" => "SCOT",
        "cibc" => "CIBC",
        "deloitte" => "DEL",
        "kpmg" => "KPMG",
        "pwc" => "PWC",
        "ey" => "EY",
        "accenture" => "ACN",
        "bnp paribas" => "BNPP",
        _ => return None,
    };
    Some(abbr)
}

fn known_word(word: &str) -> Option<&'static str> {
    let abbr = match word {
        "analyst" | "analytics" | "assistant" | "associate" => "A",
        "business" => "B",
        "co-op" | "coop" => "",
        "customer" => "C",
        "data" | "developer" | "delivery" | "digital" => "D",
        "engineer" | "engineering" | "excellence" => "E",
        "financial" => "F",
        "global" => "G",
        "health" => "H",
        "insights" | "intern" | "internship" => "I",
        "it" => "IT",
        "machine" | "marketing" | "municipal" => "M",
        "learning" => "L",
        "operations" => "O",
        "policy" | "product" => "P",
        "research" => "R",
        "revops" => "RO",
        "scientist" | "services" | "solutions" | "systems" => "S",
        "software" => "SW",
        "telecom" => "T",
        "ai" => "AI",
        "ai-ml" => "AIML",
        "ml" => "ML",
        _ => return None,
    };
    Some(abbr)
}
