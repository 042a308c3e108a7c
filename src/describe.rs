//! Human-readable listings of a record's environment variables.
//!
//! [`render`] produces the help block used by `--help` output:
//!
//! ```text
//! Environment variables:
//!   APP_PORT u16 (alternative to PORT)
//!     	Port to listen on (default "8080")
//!   PORT u16
//!     	Port to listen on (default "8080")
//! ```
//!
//! Every source name gets its own entry and entries are sorted. Fields
//! without environment variables are left out; a record with none renders as
//! an empty string.

use std::io::Write;

use crate::error::EnvfigError;
use crate::schema::{self, Configure};

pub const DEFAULT_HEADER: &str = "Environment variables:";

const TABLE_TITLE: &str = "The following environment variables can be used for configuration:";
const TABLE_PADDING: usize = 4;

pub(crate) fn render<C: Configure>(
    cfg: &mut C,
    prefix: &str,
    header: Option<&str>,
) -> Result<String, EnvfigError> {
    let mut entries = Vec::new();
    for field in schema::walk(cfg, prefix)? {
        let Some(primary) = field.primary() else {
            continue;
        };
        let kind = field.target.kind();
        for (idx, name) in field.source_names.iter().enumerate() {
            let mut entry = format!("\n  {name} {kind}");
            if idx > 0 {
                entry.push_str(&format!(" (alternative to {primary})"));
            }
            entry.push_str("\n    \t");
            entry.push_str(field.description.as_deref().unwrap_or_default());
            if let Some(default) = &field.default {
                entry.push_str(&format!(" (default {default:?})"));
            }
            entries.push(entry);
        }
    }

    if entries.is_empty() {
        return Ok(String::new());
    }
    entries.sort();
    Ok(format!(
        "{}{}",
        header.unwrap_or(DEFAULT_HEADER),
        entries.concat()
    ))
}

/// Preamble (if any), a blank line, then the description and a newline.
pub(crate) fn write_usage<C, W>(
    w: &mut W,
    cfg: &mut C,
    prefix: &str,
    header: Option<&str>,
    preamble: Option<&str>,
) -> Result<(), EnvfigError>
where
    C: Configure,
    W: Write + ?Sized,
{
    let text = render(cfg, prefix, header)?;
    if let Some(preamble) = preamble {
        write!(w, "{preamble}")?;
        if !preamble.ends_with('\n') {
            writeln!(w)?;
        }
        writeln!(w)?;
    }
    writeln!(w, "{text}")?;
    Ok(())
}

/// One row per field, keyed by its primary variable, in walk order:
///
/// ```text
/// KEY        TYPE      DEFAULT      REQUIRED    DESCRIPTION
/// HOST       String    localhost                Address to bind to
/// ```
pub(crate) fn render_table<C: Configure>(cfg: &mut C, prefix: &str) -> Result<String, EnvfigError> {
    let mut rows = vec![[
        "KEY".to_string(),
        "TYPE".into(),
        "DEFAULT".into(),
        "REQUIRED".into(),
        "DESCRIPTION".into(),
    ]];
    for field in schema::walk(cfg, prefix)? {
        let Some(primary) = field.primary() else {
            continue;
        };
        rows.push([
            primary.to_string(),
            field.target.kind(),
            field.default.clone().unwrap_or_default(),
            if field.required { "true".into() } else { String::new() },
            field.description.clone().unwrap_or_default(),
        ]);
    }

    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count() + TABLE_PADDING);
        }
    }

    let mut out = format!("{TABLE_TITLE}\n\n");
    for row in &rows {
        for (&width, cell) in widths.iter().zip(row) {
            out.push_str(&format!("{cell:<width$}"));
        }
        out.push_str(&row[4]);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::AppConfig;
    use crate::schema::Fields;

    #[derive(Default)]
    struct Single {
        one: i32,
        two: i32,
        three: i32,
    }

    impl Configure for Single {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("one", &mut self.one).env("ONE").description("one");
            f.field("two", &mut self.two).env("TWO").description("two");
            f.field("three", &mut self.three)
                .env("THREE")
                .description("three");
        }
    }

    #[derive(Default)]
    struct Several {
        one: i32,
        two: i32,
    }

    impl Configure for Several {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("one", &mut self.one).env("ONE,ENO").description("one");
            f.field("two", &mut self.two).env("TWO,OWT").description("two");
        }
    }

    #[derive(Default)]
    struct NoEnv {
        one: i32,
        two: String,
    }

    impl Configure for NoEnv {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("one", &mut self.one).default("1");
            f.field("two", &mut self.two).description("two");
        }
    }

    #[derive(Default)]
    struct Nested {
        app: App,
        database: Database,
    }

    #[derive(Default)]
    struct App {
        port: i32,
        cache: Cache,
    }

    #[derive(Default)]
    struct Cache {
        kind: String,
        redis: Redis,
    }

    #[derive(Default)]
    struct Redis {
        host: String,
    }

    #[derive(Default)]
    struct Database {
        host: String,
    }

    impl Configure for Nested {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.group("app", &mut self.app).prefix("APP_");
            f.group("database", &mut self.database).prefix("DATABASE_");
        }
    }

    impl Configure for App {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("port", &mut self.port)
                .env("PORT")
                .description("app port");
            f.group("cache", &mut self.cache).prefix("CACHE_");
        }
    }

    impl Configure for Cache {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("kind", &mut self.kind)
                .env("TYPE")
                .description("cache type");
            f.group("redis", &mut self.redis).prefix("REDIS_");
        }
    }

    impl Configure for Redis {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("host", &mut self.host)
                .env("HOST")
                .description("redis host");
        }
    }

    impl Configure for Database {
        fn fields<'a>(&'a mut self, f: &mut Fields<'a>) {
            f.field("host", &mut self.host)
                .env("HOST")
                .description("database host");
        }
    }

    const NESTED: &str = "\n  APP_CACHE_REDIS_HOST String\n    \tredis host\
                          \n  APP_CACHE_TYPE String\n    \tcache type\
                          \n  APP_PORT i32\n    \tapp port\
                          \n  DATABASE_HOST String\n    \tdatabase host";

    #[test]
    fn single_names_are_sorted() {
        let text = render(&mut Single::default(), "", None).unwrap();
        assert_eq!(
            text,
            "Environment variables:\
             \n  ONE i32\n    \tone\
             \n  THREE i32\n    \tthree\
             \n  TWO i32\n    \ttwo"
        );
    }

    #[test]
    fn alternatives_reference_primary() {
        let text = render(&mut Several::default(), "", None).unwrap();
        assert_eq!(
            text,
            "Environment variables:\
             \n  ENO i32 (alternative to ONE)\n    \tone\
             \n  ONE i32\n    \tone\
             \n  OWT i32 (alternative to TWO)\n    \ttwo\
             \n  TWO i32\n    \ttwo"
        );
    }

    #[test]
    fn defaults_are_quoted() {
        let mut cfg = AppConfig::default();
        let text = render(&mut cfg, "", None).unwrap();
        assert!(text.contains("\n  HOST String\n    \tAddress to bind to (default \"localhost\")"));
        assert!(text.contains("\n  APP_PORT u16 (alternative to PORT)\n    \tPort to listen on (default \"8080\")"));
        assert!(text.contains("\n  DEBUG bool\n    \t\n"));
        assert!(text.contains("\n  TAGS Vec<String>\n    \t"));
    }

    #[test]
    fn nothing_to_describe_is_empty() {
        assert_eq!(render(&mut NoEnv::default(), "", None).unwrap(), "");
    }

    #[test]
    fn nested_prefixes_and_custom_header() {
        let text = render(&mut Nested::default(), "", Some("test header:")).unwrap();
        assert_eq!(text, format!("test header:{NESTED}"));
    }

    #[test]
    fn root_prefix_is_rendered() {
        let text = render(&mut Single::default(), "SVC_", None).unwrap();
        assert!(text.contains("\n  SVC_ONE i32\n"));
    }

    #[test]
    fn usage_without_preamble() {
        let mut out = Vec::new();
        write_usage(&mut out, &mut Nested::default(), "", None, None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Environment variables:{NESTED}\n")
        );
    }

    #[test]
    fn usage_with_preamble() {
        let mut out = Vec::new();
        write_usage(
            &mut out,
            &mut Single::default(),
            "",
            Some("test header:"),
            Some("test1\ntest2\ntest3"),
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "test1\ntest2\ntest3\n\
             \ntest header:\
             \n  ONE i32\n    \tone\
             \n  THREE i32\n    \tthree\
             \n  TWO i32\n    \ttwo\n"
        );
    }

    #[test]
    fn table_lists_primary_names_in_walk_order() {
        let mut cfg = AppConfig::default();
        let table = render_table(&mut cfg, "").unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], TABLE_TITLE);
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("KEY    "));
        assert!(lines[2].ends_with("DESCRIPTION"));
        assert!(lines[3].starts_with("HOST "));
        assert!(lines[4].starts_with("PORT "));
        assert!(!table.contains("APP_PORT"));
        let url = lines.iter().find(|l| l.starts_with("DB_URL")).unwrap();
        assert!(url.contains("true"));
        assert!(url.ends_with("Connection string"));
        // Columns line up.
        let col = lines[2].find("TYPE").unwrap();
        assert_eq!(&lines[3][col..col + 6], "String");
    }
}
