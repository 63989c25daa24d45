//! A [`ViewRenderer`] backed by Tera templates.
//!
//! Templates are read from the configured directories, recursively, and named
//! by their path relative to the directory that holds them, with `/`
//! separators (`users/show.html`). When several directories hold the same
//! name, the first directory listed wins. A view name without an extension
//! also finds `<name>.html`.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde_json::Value;
use tera::{Context, Tera};

use waymark_core::{ViewSettings, WaymarkError, WaymarkResult};
use waymark_http::urls::view::ViewRenderer;

/// Renders views with Tera.
///
/// # Examples
///
/// ```
/// use waymark_http::urls::view::ViewRenderer;
/// use waymark_server::renderer::TeraRenderer;
///
/// let renderer = TeraRenderer::new();
/// renderer.add_raw_template("hello.html", "Hello {{ name }}!").unwrap();
///
/// let html = renderer
///     .render("hello", &serde_json::json!({"name": "World"}), true)
///     .unwrap();
/// assert_eq!(html, "Hello World!");
/// ```
pub struct TeraRenderer {
    dirs: Vec<PathBuf>,
    tera: RwLock<Tera>,
}

impl std::fmt::Debug for TeraRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeraRenderer")
            .field("dirs", &self.dirs)
            .finish_non_exhaustive()
    }
}

impl Default for TeraRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TeraRenderer {
    /// Creates a renderer with no template directories.
    pub fn new() -> Self {
        Self {
            dirs: Vec::new(),
            tera: RwLock::new(Tera::default()),
        }
    }

    /// Creates a renderer loading every template under `dirs`.
    ///
    /// Directories that do not exist are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::TemplateError`] if a template fails to parse,
    /// or [`WaymarkError::IoError`] if a directory cannot be read.
    pub fn with_dirs(dirs: Vec<PathBuf>) -> WaymarkResult<Self> {
        let renderer = Self {
            dirs,
            tera: RwLock::new(Tera::default()),
        };
        renderer.reload()?;
        Ok(renderer)
    }

    /// Creates a renderer from the view settings.
    ///
    /// # Errors
    ///
    /// See [`with_dirs`](Self::with_dirs).
    pub fn from_settings(settings: &ViewSettings) -> WaymarkResult<Self> {
        Self::with_dirs(settings.template_dirs.clone())
    }

    /// Returns the template directories.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Adds an in-memory template.
    ///
    /// # Errors
    ///
    /// Returns [`WaymarkError::TemplateError`] if the source fails to parse.
    pub fn add_raw_template(&self, name: &str, source: &str) -> WaymarkResult<()> {
        self.tera
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add_raw_template(name, source)
            .map_err(template_error)
    }

    /// Re-reads every template from the template directories.
    ///
    /// # Errors
    ///
    /// See [`with_dirs`](Self::with_dirs).
    pub fn reload(&self) -> WaymarkResult<()> {
        let mut files = Vec::new();
        for dir in self.dirs.iter().rev() {
            if dir.is_dir() {
                collect_templates(dir, dir, &mut files)?;
            } else {
                tracing::warn!(dir = %dir.display(), "Template directory does not exist");
            }
        }
        tracing::debug!(count = files.len(), "Loading templates");
        self.tera
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add_template_files(files)
            .map_err(template_error)
    }

    fn template_name(tera: &Tera, view: &str) -> String {
        let has_template = |name: &str| tera.get_template_names().any(|t| t == name);
        if !has_template(view) && Path::new(view).extension().is_none() {
            let html = format!("{view}.html");
            if has_template(&html) {
                return html;
            }
        }
        view.to_string()
    }
}

impl ViewRenderer for TeraRenderer {
    fn render(&self, view: &str, data: &Value, cache: bool) -> WaymarkResult<String> {
        if !cache {
            self.reload()?;
        }

        let context = match data {
            Value::Object(_) => Context::from_value(data.clone()).map_err(template_error)?,
            Value::Null => Context::new(),
            other => {
                let mut context = Context::new();
                context.insert("data", other);
                context
            }
        };

        let tera = self.tera.read().unwrap_or_else(PoisonError::into_inner);
        let name = Self::template_name(&tera, view);
        tera.render(&name, &context).map_err(template_error)
    }
}

/// Pushes `(file, name)` for every file under `dir`, named relative to `root`.
fn collect_templates(
    root: &Path,
    dir: &Path,
    files: &mut Vec<(PathBuf, Option<String>)>,
) -> WaymarkResult<()> {
    let mut entries = std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(std::fs::DirEntry::path);

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_templates(root, &path, files)?;
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.push((path.clone(), Some(name)));
    }
    Ok(())
}

/// Converts a Tera error, keeping its cause chain in the message.
fn template_error(e: tera::Error) -> WaymarkError {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    WaymarkError::TemplateError(message)
}
