//! Import glue generation
//!
//! Turns matched source files into the import, registration and invocation
//! statements of a generated entry file.

use super::source_matcher::{file_stem, SourceFile};
use crate::domain::ports::FileSystem;
use crate::error::{AssetError, AssetResult};

/// Stub written over empty sources that must export a default value
pub const EMPTY_DEFAULT_EXPORT: &str = "export default () => {};\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportSyntax {
    #[default]
    Js,
    Scss,
}

#[derive(Debug, Clone, Default)]
pub struct ImportFileOptions {
    pub syntax: ImportSyntax,
    /// Bind the default export to a name (otherwise side-effect import)
    pub import_name: bool,
    /// Appended to the bound name (`App`, `Extension`)
    pub import_suffix: String,
    /// Append `_{index}` to names so same-named files don't collide
    pub enumerate_imports: bool,
    pub require_default_export: bool,
    /// `window.apos.vueComponents[name] = ...`
    pub register_components: bool,
    /// `apos.tiptapExtensions.push(...)`
    pub register_tiptap_extensions: bool,
    /// Call each default export once the DOM is ready
    pub invoke_apps: bool,
    /// Downgrade a missing default export to a warning
    pub suppress_errors: bool,
}

impl ImportFileOptions {
    pub fn js() -> Self {
        Self::default()
    }

    pub fn scss() -> Self {
        Self {
            syntax: ImportSyntax::Scss,
            ..Self::default()
        }
    }
}

/// Generated glue fragments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportFileOutput {
    pub import_code: String,
    pub register_code: String,
    pub invoke_code: String,
    pub warnings: Vec<String>,
}

impl ImportFileOutput {
    pub fn is_empty(&self) -> bool {
        self.import_code.is_empty() && self.register_code.is_empty() && self.invoke_code.is_empty()
    }
}

/// `export default` appearing as code, outside comments and string literals.
fn exports_default(content: &str) -> bool {
    let code = strip_comments_and_strings(content);
    let words = code
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .filter(|w| !w.is_empty());
    let mut previous = None;
    for word in words {
        if previous == Some("export") && word == "default" {
            return true;
        }
        previous = Some(word);
    }
    false
}

/// Blank out comments and quoted literals, keeping word boundaries.
fn strip_comments_and_strings(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        break;
                    }
                }
                out.push('\n');
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut star = false;
                for next in chars.by_ref() {
                    if star && next == '/' {
                        break;
                    }
                    star = next == '*';
                }
                out.push(' ');
            }
            '"' | '\'' | '`' => {
                let mut end = ' ';
                while let Some(next) = chars.next() {
                    match next {
                        '\\' => {
                            chars.next();
                        }
                        // only template literals span lines
                        '\n' if c != '`' => {
                            end = '\n';
                            break;
                        }
                        _ if next == c => break,
                        _ => {}
                    }
                }
                out.push(end);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Identifier bound to an import: basename, `-` to `_`, extension dropped.
pub fn component_name(import_path: &str, enumerate: Option<usize>) -> String {
    let name = file_stem(import_path).replace('-', "_");
    match enumerate {
        Some(i) => format!("{}_{}", name, i),
        None => name,
    }
}

pub fn import_file_output(
    fs: &dyn FileSystem,
    components: &[SourceFile],
    options: &ImportFileOptions,
) -> AssetResult<ImportFileOutput> {
    let mut output = ImportFileOutput::default();

    for (i, component) in components.iter().enumerate() {
        if options.require_default_export {
            check_default_export(fs, component, options.suppress_errors, &mut output.warnings)?;
        }

        let specifier = quote(&component.import_path);
        if options.syntax == ImportSyntax::Scss {
            output
                .import_code
                .push_str(&format!("@import {};\n", specifier));
            continue;
        }

        if !options.import_name {
            output.import_code.push_str(&format!("import {};\n", specifier));
            continue;
        }

        let name = component_name(
            &component.import_path,
            options.enumerate_imports.then_some(i),
        );
        let binding = format!("{}{}", name, options.import_suffix);
        output
            .import_code
            .push_str(&format!("import {} from {};\n", binding, specifier));

        if options.register_components {
            output.register_code.push_str(&format!(
                "window.apos.vueComponents[{}] = {};\n",
                quote(&name),
                binding
            ));
        }
        if options.register_tiptap_extensions {
            output
                .register_code
                .push_str(&format!("apos.tiptapExtensions.push({});\n", binding));
        }
        if options.invoke_apps {
            output.invoke_code.push_str(&format!("  {}();\n", binding));
        }
    }

    Ok(output)
}

fn check_default_export(
    fs: &dyn FileSystem,
    component: &SourceFile,
    suppress_errors: bool,
    warnings: &mut Vec<String>,
) -> AssetResult<()> {
    let content = fs.read(&component.path)?;
    if exports_default(&content) {
        return Ok(());
    }
    if !suppress_errors {
        return Err(AssetError::MissingDefaultExport {
            file: component.path.clone(),
        });
    }
    if content.trim().is_empty() {
        fs.write(&component.path, EMPTY_DEFAULT_EXPORT)?;
        warnings.push(format!(
            "The file {} was empty and has been given a default export",
            component.path.display()
        ));
    } else {
        warnings.push(format!(
            "The file {} does not export a default value",
            component.path.display()
        ));
    }
    Ok(())
}

/// JSON string literal, valid in both JS and SCSS
fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Wrap invocation lines so they run once the DOM is ready.
pub fn on_dom_ready(invoke_code: &str) -> String {
    if invoke_code.is_empty() {
        return String::new();
    }
    format!(
        "if (document.readyState !== 'loading') {{\n  setTimeout(invoke, 0);\n}} else {{\n  window.addEventListener('DOMContentLoaded', invoke);\n}}\nfunction invoke() {{\n{}}}\n",
        invoke_code
    )
}
