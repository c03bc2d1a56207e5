// Company color resolution
//
// Precedence: explicit record color > alias table > positional palette.
// Names are compared after stripping legal-entity markers, lowercasing and
// dropping whitespace/punctuation, so "(주)삼성전자", "삼성전자 " and "삼성" all land
// on the same alias entry.

/// A known company and every spelling it is posted under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyAlias {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub color: &'static str,
}

pub const COMPANY_ALIASES: &[CompanyAlias] = &[
    CompanyAlias {
        canonical: "삼성",
        aliases: &["삼성", "삼성전자", "삼성sds", "삼성물산", "samsung"],
        color: "#1428A0",
    },
    CompanyAlias {
        canonical: "LG",
        aliases: &["lg", "엘지", "lg전자", "lg화학", "lgcns"],
        color: "#A50034",
    },
    CompanyAlias {
        canonical: "SK",
        aliases: &["sk", "에스케이", "sk하이닉스", "sk텔레콤", "skt"],
        color: "#EA002C",
    },
    CompanyAlias {
        canonical: "현대",
        aliases: &["현대", "현대자동차", "현대차", "hyundai"],
        color: "#002C5F",
    },
    CompanyAlias {
        canonical: "네이버",
        aliases: &["네이버", "naver"],
        color: "#03C75A",
    },
    CompanyAlias {
        canonical: "카카오",
        aliases: &["카카오", "kakao"],
        color: "#FFCD00",
    },
    CompanyAlias {
        canonical: "쿠팡",
        aliases: &["쿠팡", "coupang"],
        color: "#C73D2B",
    },
    CompanyAlias {
        canonical: "라인",
        aliases: &["라인", "라인플러스", "linecorp"],
        color: "#06C755",
    },
    CompanyAlias {
        canonical: "우아한형제들",
        aliases: &["우아한형제들", "배달의민족", "배민", "woowahan"],
        color: "#2AC1BC",
    },
    CompanyAlias {
        canonical: "토스",
        aliases: &["토스", "비바리퍼블리카", "toss"],
        color: "#0064FF",
    },
    CompanyAlias {
        canonical: "당근",
        aliases: &["당근", "당근마켓", "daangn", "karrot"],
        color: "#FF6F0F",
    },
    CompanyAlias {
        canonical: "KT",
        aliases: &["kt", "케이티"],
        color: "#E60012",
    },
    CompanyAlias {
        canonical: "CJ",
        aliases: &["cj", "씨제이", "cj제일제당", "cj대한통운"],
        color: "#0A4DA2",
    },
    CompanyAlias {
        canonical: "롯데",
        aliases: &["롯데", "lotte"],
        color: "#DA291C",
    },
];

/// Fallback colors assigned by record position
pub const FALLBACK_PALETTE: &[&str] = &[
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6",
    "#EC4899", "#14B8A6", "#F97316", "#6366F1", "#84CC16",
];

/// Korean and English legal-entity markers removed before matching
const LEGAL_MARKERS: &[&str] = &["(주)", "㈜", "주식회사", "(유)", "유한회사", "(株)"];
const LEGAL_SUFFIXES: &[&str] = &["co.,ltd.", "co.,ltd", "corporation", "corp.", "corp", "inc.", "inc", "ltd.", "ltd"];

/// Shortest name or alias allowed to take part in a substring match
const MIN_SUBSTRING_CHARS: usize = 2;

/// Reduce a company name to its comparison key
pub fn normalize_company_name(name: &str) -> String {
    let mut key = name.to_lowercase();
    for marker in LEGAL_MARKERS {
        key = key.replace(marker, "");
    }

    let mut compact: String = key.chars().filter(|c| !c.is_whitespace()).collect();
    loop {
        let trimmed = compact.trim_end_matches([',', '.']);
        let stripped = LEGAL_SUFFIXES
            .iter()
            .find_map(|suffix| trimmed.strip_suffix(suffix).filter(|rest| !rest.is_empty()));
        match stripped {
            Some(rest) => compact = rest.to_string(),
            None => {
                compact = trimmed.to_string();
                break;
            }
        }
    }

    compact.chars().filter(|c| !matches!(c, ',' | '.' | '-' | '_' | '(' | ')')).collect()
}

/// Find the alias entry for a company name: exact match on any alias first, then
/// substring match in either direction.
pub fn lookup_alias(name: &str) -> Option<&'static CompanyAlias> {
    let key = normalize_company_name(name);
    if key.is_empty() {
        return None;
    }

    let exact = COMPANY_ALIASES
        .iter()
        .find(|entry| entry.aliases.iter().any(|alias| normalize_company_name(alias) == key));
    if exact.is_some() {
        return exact;
    }

    if key.chars().count() < MIN_SUBSTRING_CHARS {
        return None;
    }
    COMPANY_ALIASES.iter().find(|entry| {
        entry.aliases.iter().any(|alias| {
            let alias = normalize_company_name(alias);
            alias.chars().count() >= MIN_SUBSTRING_CHARS
                && (key.contains(&alias) || alias.contains(&key))
        })
    })
}

/// Pick the display color for a company
pub fn resolve_color(explicit: Option<&str>, name: &str, index: usize) -> String {
    if let Some(color) = explicit.map(str::trim).filter(|c| !c.is_empty()) {
        return color.to_string();
    }
    if let Some(entry) = lookup_alias(name) {
        return entry.color.to_string();
    }
    FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()].to_string()
}
