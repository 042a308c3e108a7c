//! The population pass.
//!
//! For each leaf, in walk order:
//!
//! 1. Fields not declared `updatable` are skipped in an update-only pass.
//! 2. The first source name whose variable is set (even to an empty string)
//!    supplies the raw value.
//! 3. Without a variable, a zero-valued field fails if it is required, and
//!    otherwise takes its default when it declares one. A field that already
//!    holds a value keeps it.
//! 4. The raw value is coerced into the field.
//!
//! The first failure aborts the pass. Fields assigned before it keep their
//! new values.

use crate::coerce::{ParseContext, Parsers};
use crate::env::EnvStore;
use crate::error::EnvfigError;
use crate::schema::{self, Configure, FieldDescriptor};
use crate::types::Pass;

/// Where a field's raw value came from.
enum Source {
    Env(String, String),
    Default(String),
}

pub(crate) fn populate<C, E>(
    cfg: &mut C,
    env: &E,
    parsers: &Parsers,
    prefix: &str,
    pass: Pass,
) -> Result<(), EnvfigError>
where
    C: Configure,
    E: EnvStore + ?Sized,
{
    // Check the declarations before the refresh hook sees the record.
    schema::walk(cfg, prefix)?;
    cfg.refresh().map_err(EnvfigError::Refresh)?;

    let descriptors = schema::walk(cfg, prefix)?;
    tracing::debug!(
        fields = descriptors.len(),
        ?pass,
        prefix,
        "populating from environment"
    );

    for mut field in descriptors {
        if pass == Pass::UpdateOnly && !field.updatable {
            tracing::trace!(path = %field.path, "skipped: not updatable");
            continue;
        }
        let Some(source) = resolve(&field, env)? else {
            tracing::trace!(path = %field.path, "left untouched");
            continue;
        };
        assign(&mut field, source, parsers)?;
    }
    Ok(())
}

fn resolve<E>(field: &FieldDescriptor<'_>, env: &E) -> Result<Option<Source>, EnvfigError>
where
    E: EnvStore + ?Sized,
{
    for name in &field.source_names {
        if let Some(raw) = env.get(name) {
            return Ok(Some(Source::Env(name.clone(), raw)));
        }
    }
    if !field.target.is_zero() {
        return Ok(None);
    }
    if field.required {
        return Err(EnvfigError::Required {
            path: field.path.clone(),
            env: field.primary().map(str::to_string),
        });
    }
    Ok(field.default.clone().map(Source::Default))
}

fn assign(
    field: &mut FieldDescriptor<'_>,
    source: Source,
    parsers: &Parsers,
) -> Result<(), EnvfigError> {
    let (env, raw) = match source {
        Source::Env(name, raw) => {
            tracing::trace!(path = %field.path, env = %name, "from environment");
            (name, raw)
        }
        Source::Default(raw) => {
            tracing::trace!(path = %field.path, "from default");
            (String::new(), raw)
        }
    };
    let cx = ParseContext::new(parsers, &field.separator, field.layout.as_deref());
    field
        .target
        .assign(&raw, &cx)
        .map_err(|source| EnvfigError::Parse {
            path: field.path.clone(),
            env,
            source,
        })
}
