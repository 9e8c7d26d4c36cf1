//! C proxy emitter
//!
//! Renders the registry as a C translation unit (one addressable function
//! per macro or inline primitive) and a matching header for the binding
//! generator. `build.rs` compiles this file directly, so it only depends on
//! `registry`, `config` and `error`.

use crate::config::CodegenConfig;
use crate::error::Result;
use crate::registry::{Kind, Primitive, DIAGNOSTIC_SYMBOL, LIST_N_SYMBOL};
use std::fs;
use std::path::{Path, PathBuf};

const PARAM_NAMES: [&str; 2] = ["x", "y"];

const BANNER: &str = "/* Generated from the guile-shim primitive registry. Do not edit. */\n";

const INCLUDES: &str = "#include <libguile.h>\n#include <stdbool.h>\n";

/// Parameter list in C, e.g. `SCM x, SCM y` or `void`.
fn c_params(p: &Primitive) -> String {
    if p.args.is_empty() {
        return "void".to_string();
    }
    p.args
        .iter()
        .zip(PARAM_NAMES)
        .map(|(kind, name)| format!("{} {}", kind.c_type(), name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `bool gu_scm_is_eq(SCM x, SCM y)`
pub fn prototype(p: &Primitive) -> String {
    format!("{} {}({})", p.ret.c_type(), p.symbol(), c_params(p))
}

/// Full C definition of one proxy.
pub fn definition(p: &Primitive) -> String {
    let call = if p.is_constant() {
        p.name.to_string()
    } else {
        let args = PARAM_NAMES[..p.arity()].join(", ");
        format!("{}({})", p.name, args)
    };

    let body = match p.ret {
        Kind::Unit => format!("{};", call),
        _ => format!("return {};", call),
    };

    format!("{} {{\n    {}\n}}\n", prototype(p), body)
}

/// The proxy translation unit.
pub fn emit_source(primitives: &[Primitive]) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push_str(INCLUDES);

    for p in primitives {
        out.push('\n');
        out.push_str(&definition(p));
    }

    out
}

/// Prototypes for every exported symbol, hand-written entry points included.
pub fn emit_header(primitives: &[Primitive], config: &CodegenConfig) -> String {
    let guard = include_guard(&config.header_name);

    let mut out = String::new();
    out.push_str(BANNER);
    out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
    out.push_str(INCLUDES);
    out.push('\n');

    for p in primitives {
        out.push_str(&prototype(p));
        out.push_str(";\n");
    }

    out.push('\n');
    out.push_str(&format!("SCM {}(const SCM *elts);\n", LIST_N_SYMBOL));
    out.push_str(&format!("void {}(void);\n", DIAGNOSTIC_SYMBOL));
    out.push_str(&format!("\n#endif /* {guard} */\n"));
    out
}

fn include_guard(header_name: &str) -> String {
    header_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

/// Paths written by [`write_artifacts`]
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub source: PathBuf,
    pub header: Option<PathBuf>,
}

/// Write the translation unit (and the header, if enabled) into `out_dir`.
pub fn write_artifacts(
    out_dir: &Path,
    primitives: &[Primitive],
    config: &CodegenConfig,
) -> Result<Artifacts> {
    let source = out_dir.join(&config.source_name);
    fs::write(&source, emit_source(primitives))?;

    let header = if config.emit_header {
        let path = out_dir.join(&config.header_name);
        fs::write(&path, emit_header(primitives, config))?;
        Some(path)
    } else {
        None
    };

    Ok(Artifacts { source, header })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{find, PRIMITIVES};

    #[test]
    fn test_constant_definition() {
        let p = find("SCM_BOOL_T").unwrap();
        assert_eq!(prototype(p), "SCM gu_SCM_BOOL_T(void)");
        assert_eq!(
            definition(p),
            "SCM gu_SCM_BOOL_T(void) {\n    return SCM_BOOL_T;\n}\n"
        );
    }

    #[test]
    fn test_unary_truth_definition() {
        let p = find("scm_is_pair").unwrap();
        assert_eq!(
            definition(p),
            "bool gu_scm_is_pair(SCM x) {\n    return scm_is_pair(x);\n}\n"
        );
    }

    #[test]
    fn test_binary_definitions() {
        assert_eq!(
            prototype(find("SCM_IS_A_P").unwrap()),
            "bool gu_SCM_IS_A_P(SCM x, SCM y)"
        );
        assert_eq!(
            definition(find("SCM_SETCDR").unwrap()),
            "void gu_SCM_SETCDR(SCM x, SCM y) {\n    SCM_SETCDR(x, y);\n}\n"
        );
    }

    #[test]
    fn test_unpack_uses_bits_type() {
        assert_eq!(
            prototype(find("SCM_UNPACK").unwrap()),
            "scm_t_bits gu_SCM_UNPACK(SCM x)"
        );
    }

    #[test]
    fn test_include_guard() {
        assert_eq!(include_guard("guile_shim.h"), "GUILE_SHIM_H");
        assert_eq!(include_guard("my-shim.h"), "MY_SHIM_H");
    }

    #[test]
    fn test_write_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = CodegenConfig::default();
        let written = write_artifacts(dir.path(), PRIMITIVES, &config).unwrap();

        let source = fs::read_to_string(&written.source).unwrap();
        assert!(source.contains("#include <libguile.h>"));

        let header = fs::read_to_string(written.header.unwrap()).unwrap();
        assert!(header.contains("SCM gu_scm_list_n(const SCM *elts);"));
    }

    #[test]
    fn test_header_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = CodegenConfig {
            emit_header: false,
            ..CodegenConfig::default()
        };
        let written = write_artifacts(dir.path(), PRIMITIVES, &config).unwrap();
        assert!(written.header.is_none());
        assert!(!dir.path().join("guile_shim.h").exists());
    }
}
