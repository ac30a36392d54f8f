//! Local project import.
//!
//! Files picked in the browser (a whole folder or a loose selection) are
//! filtered, assembled into a tree and analysed. Once the user confirms, the
//! tree replaces the workspace.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use rand::Rng;
use regex::RegexSet;

use crate::config::import::PROGRESS_STEP;
use crate::core::error::{FileTreeError, ImportError};
use crate::core::file_tree;
use crate::core::random::new_id;
use crate::models::{FileNode, join_path};
use crate::utils::format::format_size;

/// Extensions whose content is read; anything else is imported empty.
const TEXT_EXTENSIONS: &[&str] = &[
    ".cairo", ".toml", ".md", ".txt", ".json", ".yaml", ".yml", ".rs", ".py", ".js", ".ts",
];

/// Dependencies recognised in sources and manifests.
const KNOWN_DEPENDENCIES: &[&str] = &["starknet", "openzeppelin"];

static IGNORED: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(^|/)\.[^/]",
        r"(^|/)(target|build|dist|out)/",
        r"(^|/)node_modules/",
        r"(^|/)(\.DS_Store|Thumbs\.db)$",
        r"(^|/)(package-lock\.json|yarn\.lock|Cargo\.lock)$",
    ])
    .expect("valid regex")
});

fn file_name(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

pub fn is_text_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    TEXT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Hidden entries, build output, dependency folders, OS litter and lock files.
pub fn should_ignore(relative_path: &str) -> bool {
    IGNORED.is_match(relative_path.trim_start_matches('/'))
}

/// Whether the browser should read this file's text before import.
pub fn wants_content(relative_path: &str) -> bool {
    !should_ignore(relative_path) && is_text_file(file_name(relative_path))
}

/// A file picked in the browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    /// Path relative to the picked folder, or the bare file name
    pub relative_path: String,
    pub size: u64,
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectType {
    Scarb,
    Cairo,
    Mixed,
    Unknown,
}

impl ProjectType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Scarb => "SCARB",
            Self::Cairo => "CAIRO",
            Self::Mixed => "MIXED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Summary shown before the user confirms an import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectAnalysis {
    pub total_files: usize,
    pub cairo_files: usize,
    pub contracts: usize,
    /// Sorted, without duplicates
    pub dependencies: Vec<String>,
    pub project_type: ProjectType,
    pub has_scarb_toml: bool,
    pub has_cairo_project: bool,
    pub total_size: u64,
}

impl ProjectAnalysis {
    pub fn estimated_size(&self) -> String {
        format_size(self.total_size)
    }
}

/// Inspect an assembled tree.
pub fn analyze(nodes: &[FileNode], total_size: u64) -> ProjectAnalysis {
    let mut analysis = ProjectAnalysis {
        total_files: 0,
        cairo_files: 0,
        contracts: 0,
        dependencies: Vec::new(),
        project_type: ProjectType::Unknown,
        has_scarb_toml: false,
        has_cairo_project: false,
        total_size,
    };
    let mut dependencies = BTreeSet::new();
    let mut scan = |text: &str| {
        for dep in KNOWN_DEPENDENCIES {
            if text.contains(dep) {
                dependencies.insert(dep.to_string());
            }
        }
    };

    for file in file_tree::files(nodes) {
        let content = file.content.as_deref().unwrap_or_default();
        analysis.total_files += 1;
        if file.name.ends_with(".cairo") {
            analysis.cairo_files += 1;
            if content.contains("#[starknet::contract]") || content.contains("@contract") {
                analysis.contracts += 1;
            }
            scan(content);
        }
        match file.name.as_str() {
            "Scarb.toml" => {
                analysis.has_scarb_toml = true;
                scan(content);
            }
            "cairo_project.toml" => analysis.has_cairo_project = true,
            _ => {}
        }
    }

    analysis.dependencies = dependencies.into_iter().collect();
    analysis.project_type = if analysis.cairo_files == 0 {
        ProjectType::Unknown
    } else if analysis.has_scarb_toml {
        ProjectType::Scarb
    } else if analysis.has_cairo_project {
        ProjectType::Cairo
    } else {
        ProjectType::Mixed
    };
    analysis
}

/// Uploaded files turned into a tree, ready for confirmation.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedProject {
    pub files: Vec<FileNode>,
    pub analysis: ProjectAnalysis,
    /// Ignored or unplaceable uploads
    pub skipped: usize,
}

/// Build the tree from uploads, dropping ignored files.
///
/// Shallow paths are placed first so a folder always exists before its
/// contents. A file that clashes with an existing entry is skipped.
pub fn prepare<R: Rng + ?Sized>(rng: &mut R, mut uploads: Vec<UploadedFile>) -> PreparedProject {
    uploads.sort_by_key(|u| u.relative_path.split('/').count());

    let mut files = Vec::new();
    let mut skipped = 0;
    let mut total_size = 0;
    for upload in uploads {
        let path = upload.relative_path.trim_matches('/');
        if path.is_empty() || should_ignore(path) {
            skipped += 1;
            continue;
        }
        match place(rng, &mut files, path, upload.content) {
            Ok(()) => total_size += upload.size,
            Err(_) => skipped += 1,
        }
    }

    let analysis = analyze(&files, total_size);
    PreparedProject {
        files,
        analysis,
        skipped,
    }
}

fn place<R: Rng + ?Sized>(
    rng: &mut R,
    nodes: &mut Vec<FileNode>,
    path: &str,
    content: String,
) -> Result<(), FileTreeError> {
    let (folders, name) = match path.rsplit_once('/') {
        Some((folders, name)) => (Some(folders), name),
        None => (None, path),
    };

    let mut parent: Option<String> = None;
    for folder in folders.into_iter().flat_map(|f| f.split('/')) {
        let folder_path = join_path(parent.as_deref(), folder);
        match file_tree::find(nodes, &folder_path) {
            Some(node) if node.is_folder() => {}
            Some(_) => return Err(FileTreeError::NotAFolder(folder_path)),
            None => {
                let node = FileNode::folder(new_id(rng), None, folder);
                file_tree::insert(nodes, parent.as_deref(), node)?;
            }
        }
        parent = Some(folder_path);
    }

    let file = FileNode::file(new_id(rng), None, name, content);
    file_tree::insert(nodes, parent.as_deref(), file).map(|_| ())
}

/// Where the import dialog is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImportStage {
    /// Waiting for files
    #[default]
    Upload,
    Analyzing { read: usize, total: usize },
    Confirm,
    Importing { progress: u8 },
    Done,
}

/// State of one import dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectImport {
    stage: ImportStage,
    project: Option<PreparedProject>,
}

impl ProjectImport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> ImportStage {
        self.stage
    }

    pub fn project(&self) -> Option<&PreparedProject> {
        self.project.as_ref()
    }

    /// Percentage for the progress bar of the current stage.
    pub fn progress(&self) -> u32 {
        match self.stage {
            ImportStage::Upload => 0,
            ImportStage::Analyzing { read, total } => (read * 100 / total.max(1)) as u32,
            ImportStage::Importing { progress } => u32::from(progress),
            ImportStage::Confirm | ImportStage::Done => 100,
        }
    }

    /// Start reading `total` picked files.
    pub fn begin_reading(&mut self, total: usize) {
        self.project = None;
        self.stage = ImportStage::Analyzing { read: 0, total };
    }

    pub fn file_read(&mut self) {
        if let ImportStage::Analyzing { read, total } = &mut self.stage {
            *read = (*read + 1).min(*total);
        }
    }

    /// Reading finished; show the analysis.
    pub fn analyzed(&mut self, project: PreparedProject) {
        if matches!(self.stage, ImportStage::Analyzing { .. }) {
            self.project = Some(project);
            self.stage = ImportStage::Confirm;
        }
    }

    /// Drop the analysed files and pick again.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    /// User confirmed the analysed project.
    pub fn start_import(&mut self) -> Result<(), ImportError> {
        if self.stage != ImportStage::Confirm {
            return Err(ImportError::NotReady);
        }
        match &self.project {
            Some(project) if project.analysis.total_files > 0 => {
                self.stage = ImportStage::Importing { progress: 0 };
                Ok(())
            }
            _ => Err(ImportError::NoFiles),
        }
    }

    /// Advance the import progress, returning true once it reaches 100.
    pub fn tick(&mut self) -> bool {
        match &mut self.stage {
            ImportStage::Importing { progress } => {
                *progress = progress.saturating_add(PROGRESS_STEP).min(100);
                *progress == 100
            }
            ImportStage::Done => true,
            _ => false,
        }
    }

    /// The imported project, handed out once after the progress completes.
    pub fn finish(&mut self) -> Option<PreparedProject> {
        if self.stage != (ImportStage::Importing { progress: 100 }) {
            return None;
        }
        self.stage = ImportStage::Done;
        self.project.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn upload(path: &str, content: &str) -> UploadedFile {
        UploadedFile {
            relative_path: path.to_string(),
            size: content.len() as u64,
            content: content.to_string(),
        }
    }

    fn vault_upload() -> Vec<UploadedFile> {
        vec![
            upload("vault/src/vault.cairo", "#[starknet::contract]\nmod Vault {}\n"),
            upload("vault/Scarb.toml", "[dependencies]\nstarknet = \"2.8.0\"\nopenzeppelin = \"0.17\"\n"),
            upload("vault/src/lib.cairo", "mod vault;\n"),
            upload("vault/node_modules/pkg/index.js", "x"),
            upload("vault/.git/HEAD", "ref"),
            upload("vault/target/dev/vault.json", "{}"),
            upload("vault/.DS_Store", ""),
        ]
    }

    #[test]
    fn test_should_ignore() {
        for path in [
            ".env",
            "proj/.git/config",
            "proj/node_modules/a/b.js",
            "proj/target/dev/x.json",
            "proj/dist/bundle.js",
            "proj/Thumbs.db",
            "proj/Cargo.lock",
            "/proj/.vscode/settings.json",
        ] {
            assert!(should_ignore(path), "{path}");
        }
        for path in ["proj/src/lib.cairo", "proj/Scarb.toml", "proj/outline.md", "proj/src/builder.cairo"] {
            assert!(!should_ignore(path), "{path}");
        }
    }

    #[test]
    fn test_text_detection() {
        assert!(is_text_file("lib.CAIRO"));
        assert!(is_text_file("Scarb.toml"));
        assert!(!is_text_file("logo.png"));
        assert!(wants_content("proj/README.md"));
        assert!(!wants_content("proj/logo.png"));
        assert!(!wants_content("proj/node_modules/readme.md"));
    }

    #[test]
    fn test_prepare_builds_sorted_tree() {
        let project = prepare(&mut StdRng::seed_from_u64(1), vault_upload());
        assert_eq!(project.skipped, 4);

        let paths: Vec<_> = file_tree::files(&project.files)
            .into_iter()
            .map(|f| f.path.as_str())
            .collect();
        assert_eq!(paths, ["/vault/src/lib.cairo", "/vault/src/vault.cairo", "/vault/Scarb.toml"]);
        assert!(file_tree::find(&project.files, "/vault/src").unwrap().is_folder());
    }

    #[test]
    fn test_prepare_skips_clashing_paths() {
        let uploads = vec![
            upload("a.cairo", "mod a;"),
            upload("a.cairo", "mod b;"),
            upload("a.cairo/inner.cairo", ""),
        ];
        let project = prepare(&mut StdRng::seed_from_u64(2), uploads);
        assert_eq!(project.analysis.total_files, 1);
        assert_eq!(project.skipped, 2);
        assert_eq!(
            file_tree::find(&project.files, "/a.cairo").unwrap().content.as_deref(),
            Some("mod a;")
        );
    }

    #[test]
    fn test_analyze_scarb_project() {
        let project = prepare(&mut StdRng::seed_from_u64(1), vault_upload());
        let analysis = &project.analysis;
        assert_eq!(analysis.total_files, 3);
        assert_eq!(analysis.cairo_files, 2);
        assert_eq!(analysis.contracts, 1);
        assert_eq!(analysis.dependencies, ["openzeppelin", "starknet"]);
        assert_eq!(analysis.project_type, ProjectType::Scarb);
        assert!(analysis.has_scarb_toml);
        assert!(!analysis.has_cairo_project);
        assert_eq!(analysis.total_size, 102);
    }

    #[test]
    fn test_project_type() {
        let kind = |uploads: Vec<UploadedFile>| {
            prepare(&mut StdRng::seed_from_u64(3), uploads).analysis.project_type
        };
        assert_eq!(
            kind(vec![upload("cairo_project.toml", ""), upload("main.cairo", "")]),
            ProjectType::Cairo
        );
        assert_eq!(kind(vec![upload("main.cairo", "")]), ProjectType::Mixed);
        assert_eq!(kind(vec![upload("Scarb.toml", "")]), ProjectType::Unknown);
        assert_eq!(kind(vec![]), ProjectType::Unknown);
    }

    #[test]
    fn test_import_stages() {
        let mut import = ProjectImport::new();
        assert_eq!(import.start_import(), Err(ImportError::NotReady));

        import.begin_reading(4);
        import.file_read();
        assert_eq!(import.progress(), 25);

        import.analyzed(prepare(&mut StdRng::seed_from_u64(1), vault_upload()));
        assert_eq!(import.stage(), ImportStage::Confirm);
        assert!(import.finish().is_none());

        import.start_import().unwrap();
        let mut ticks = 1;
        while !import.tick() {
            ticks += 1;
        }
        assert_eq!(ticks, 100 / usize::from(PROGRESS_STEP));

        let project = import.finish().unwrap();
        assert_eq!(project.analysis.contracts, 1);
        assert_eq!(import.stage(), ImportStage::Done);
        assert!(import.finish().is_none());
    }

    #[test]
    fn test_empty_selection_cannot_be_imported() {
        let mut import = ProjectImport::new();
        import.begin_reading(1);
        import.analyzed(prepare(&mut StdRng::seed_from_u64(1), vec![upload(".env", "")]));
        assert_eq!(import.start_import(), Err(ImportError::NoFiles));

        import.restart();
        assert_eq!(import.stage(), ImportStage::Upload);
        assert!(import.project().is_none());
    }
}
