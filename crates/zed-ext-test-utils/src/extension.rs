//! [`ExtensionFixture`] describing the contents of an installed extension.

use std::fs;
use std::path::Path;

use crate::archive::TarGzBuilder;

/// Builder for an extension's files: `extension.toml`, language
/// directories with their `config.toml`, and theme files.
///
/// The same fixture can be written straight into an `installed/<id>`
/// directory or packed as the tarball a registry would serve.
#[derive(Debug, Clone)]
pub struct ExtensionFixture {
    pub id: String,
    pub name: String,
    pub version: String,
    declared_languages: Option<Vec<String>>,
    declared_themes: Option<Vec<String>>,
    extra_manifest: String,
    files: Vec<(String, String)>,
}

impl ExtensionFixture {
    /// A fixture with a manifest only; the display name is derived from `id`.
    pub fn new(id: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            name: format!("{id} extension"),
            version: version.to_string(),
            declared_languages: None,
            declared_themes: None,
            extra_manifest: String::new(),
            files: Vec::new(),
        }
    }

    /// List language directories explicitly in the manifest.
    pub fn declare_languages(mut self, dirs: &[&str]) -> Self {
        self.declared_languages = Some(dirs.iter().map(|d| d.to_string()).collect());
        self
    }

    /// List theme files explicitly in the manifest.
    pub fn declare_themes(mut self, paths: &[&str]) -> Self {
        self.declared_themes = Some(paths.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Append raw TOML to the manifest (e.g. a `[grammars.foo]` table).
    pub fn manifest_extra(mut self, toml: &str) -> Self {
        self.extra_manifest.push_str(toml);
        self
    }

    /// Add a language directory. With `name`, a `config.toml` declaring it
    /// is written inside; without, only a placeholder file is.
    pub fn language_dir(mut self, dir: &str, name: Option<&str>) -> Self {
        match name {
            Some(name) => self.files.push((
                format!("{dir}/config.toml"),
                format!("name = \"{name}\"\ngrammar = \"{name}\"\n"),
            )),
            None => self
                .files
                .push((format!("{dir}/highlights.scm"), "(comment) @comment\n".to_string())),
        }
        self
    }

    /// Add a theme file with minimal JSON content.
    pub fn theme_file(mut self, path: &str) -> Self {
        self.files
            .push((path.to_string(), "{\"name\": \"fixture\", \"themes\": []}".to_string()));
        self
    }

    /// Add an arbitrary file.
    pub fn file(mut self, path: &str, contents: &str) -> Self {
        self.files.push((path.to_string(), contents.to_string()));
        self
    }

    /// Render `extension.toml`.
    pub fn manifest_toml(&self) -> String {
        let mut toml = format!(
            "id = \"{}\"\nname = \"{}\"\nversion = \"{}\"\nschema_version = 1\n\
             description = \"Fixture extension\"\nauthors = [\"Test <test@example.com>\"]\n\
             repository = \"https://github.com/example/{}\"\n",
            self.id, self.name, self.version, self.id
        );
        if let Some(languages) = &self.declared_languages {
            toml.push_str(&format!("languages = {}\n", toml_list(languages)));
        }
        if let Some(themes) = &self.declared_themes {
            toml.push_str(&format!("themes = {}\n", toml_list(themes)));
        }
        toml.push_str(&self.extra_manifest);
        toml
    }

    /// Write the extension's files into `dir` (its installation directory).
    pub fn write_to(&self, dir: &Path) {
        fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("ExtensionFixture: create {}: {e}", dir.display()));
        fs::write(dir.join("extension.toml"), self.manifest_toml())
            .unwrap_or_else(|e| panic!("ExtensionFixture: write extension.toml: {e}"));
        for (path, contents) in &self.files {
            let target = dir.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).unwrap_or_else(|e| {
                    panic!("ExtensionFixture: create {}: {e}", parent.display())
                });
            }
            fs::write(&target, contents)
                .unwrap_or_else(|e| panic!("ExtensionFixture: write {}: {e}", target.display()));
        }
    }

    /// Pack the extension as a registry tarball with `./`-prefixed entries.
    pub fn to_tar_gz(&self) -> Vec<u8> {
        let mut builder = TarGzBuilder::new()
            .raw_dir("./")
            .raw_file("./extension.toml", self.manifest_toml().as_bytes());
        for (path, contents) in &self.files {
            if let Some((parent, _)) = path.rsplit_once('/') {
                builder = builder.raw_dir(&format!("./{parent}/"));
            }
            builder = builder.raw_file(&format!("./{path}"), contents.as_bytes());
        }
        builder.finish()
    }
}

fn toml_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|i| format!("\"{i}\"")).collect();
    format!("[{}]", quoted.join(", "))
}
