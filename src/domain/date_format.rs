// Token-based date formatting for selector labels
use chrono::{Datelike, NaiveDateTime, Timelike};

type Resolver = fn(&NaiveDateTime) -> String;

/// Ordered `(token, resolver)` pairs. Tokens are tried longest first at every
/// position, so `MMMM` always wins over `MMM`, `MM` and `M`. Text inside
/// `[...]` is copied verbatim.
#[derive(Clone)]
pub struct DateFormatter {
    tokens: Vec<(&'static str, Resolver)>,
}

impl DateFormatter {
    pub fn new(mut tokens: Vec<(&'static str, Resolver)>) -> Self {
        // stable sort keeps registration order among equal lengths
        tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { tokens }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            token("YYYY", |dt| format!("{:04}", dt.year())),
            token("YY", |dt| format!("{:02}", dt.year().rem_euclid(100))),
            token("MMMM", |dt| dt.format("%B").to_string()),
            token("MMM", |dt| dt.format("%b").to_string()),
            token("MM", |dt| format!("{:02}", dt.month())),
            token("M", |dt| dt.month().to_string()),
            token("DD", |dt| format!("{:02}", dt.day())),
            token("D", |dt| dt.day().to_string()),
            token("dddd", |dt| dt.format("%A").to_string()),
            token("ddd", |dt| dt.format("%a").to_string()),
            token("HH", |dt| format!("{:02}", dt.hour())),
            token("H", |dt| dt.hour().to_string()),
            token("mm", |dt| format!("{:02}", dt.minute())),
            token("ss", |dt| format!("{:02}", dt.second())),
            token("SSS", |dt| format!("{:03}", dt.nanosecond() / 1_000_000 % 1_000)),
        ])
    }

    pub fn format(&self, pattern: &str, dt: &NaiveDateTime) -> String {
        let mut out = String::with_capacity(pattern.len() + 8);
        let mut rest = pattern;

        'scan: while !rest.is_empty() {
            if let Some(literal) = rest.strip_prefix('[') {
                match literal.find(']') {
                    Some(end) => {
                        out.push_str(&literal[..end]);
                        rest = &literal[end + 1..];
                        continue;
                    }
                    None => {
                        out.push_str(literal);
                        break;
                    }
                }
            }

            for (token, resolve) in &self.tokens {
                if let Some(tail) = rest.strip_prefix(token) {
                    out.push_str(&resolve(dt));
                    rest = tail;
                    continue 'scan;
                }
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }

        out
    }
}

fn token(name: &'static str, resolve: Resolver) -> (&'static str, Resolver) {
    (name, resolve)
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for DateFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tokens: Vec<&str> = self.tokens.iter().map(|(t, _)| *t).collect();
        f.debug_struct("DateFormatter").field("tokens", &tokens).finish()
    }
}
