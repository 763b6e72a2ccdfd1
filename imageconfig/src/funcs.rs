//! Name-based dispatch for template engines

use crate::config::ImageConfig;
use crate::decode::ConfigDecoder;
use crate::error::{Error, Result};
use crate::fs::Filesystem;
use crate::namespace::Namespace;
use crate::value::Value;

pub const NAMESPACE: &str = "images";

pub struct FuncInfo {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub example: (&'static str, &'static str),
}

pub const FUNCS: &[FuncInfo] = &[FuncInfo {
    name: "Config",
    aliases: &["imageConfig"],
    example: (
        r#"{{ $c := imageConfig "static/logo.png" }}{{ $c.Width }}x{{ $c.Height }}"#,
        "10x20",
    ),
}];

/// Look up a function by name or alias.
pub fn lookup(name: &str) -> Option<&'static FuncInfo> {
    FUNCS
        .iter()
        .find(|f| f.name == name || f.aliases.iter().any(|alias| *alias == name))
}

impl<F: Filesystem, D: ConfigDecoder> Namespace<F, D> {
    /// Call a namespace function the way a template does.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<ImageConfig> {
        let func = lookup(name).ok_or_else(|| {
            Error::invalid_argument(format!("unknown function {NAMESPACE}.{name}"))
        })?;

        match (func.name, args) {
            ("Config", [path]) => self.config(path.clone()),
            (name, args) => Err(Error::invalid_argument(format!(
                "{NAMESPACE}.{name} takes 1 argument, got {}",
                args.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{DynamicImage, GrayImage, ImageFormat};

    use super::*;
    use crate::config::ColorModel;
    use crate::fs::MemoryFs;

    fn namespace() -> Namespace<MemoryFs> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(GrayImage::new(10, 20))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();

        let fs = MemoryFs::new();
        fs.insert("static/logo.png", buf.into_inner()).unwrap();
        Namespace::new(fs)
    }

    #[test]
    fn alias_and_name_dispatch() {
        let ns = namespace();
        let args = [Value::from("static/logo.png")];

        let by_alias = ns.call("imageConfig", &args).unwrap();
        assert_eq!(by_alias, ImageConfig::new(10, 20, ColorModel::Gray));
        assert_eq!(ns.call("Config", &args).unwrap(), by_alias);
        assert_eq!(ns.len(), 1);
    }

    #[test]
    fn unknown_function() {
        let err = namespace().call("Filter", &[]).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "unknown function images.Filter");
    }

    #[test]
    fn wrong_arity() {
        let ns = namespace();
        assert!(ns.call("imageConfig", &[]).unwrap_err().is_invalid_argument());

        let two = [Value::from("a.png"), Value::from("b.png")];
        let err = ns.call("Config", &two).unwrap_err();
        assert_eq!(err.to_string(), "images.Config takes 1 argument, got 2");
    }

    #[test]
    fn lookup_by_alias() {
        assert_eq!(lookup("imageConfig").map(|f| f.name), Some("Config"));
        assert!(lookup("imageconfig").is_none());
    }
}
