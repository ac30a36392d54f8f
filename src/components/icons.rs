//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuChevronDown as ChevronDown, LuChevronRight as ChevronRight, LuCopy as Copy, LuDownload as Download,
        LuFile as File, LuFilePlus as FilePlus, LuFolder as Folder, LuFolderOpen as FolderOpen,
        LuFolderPlus as FolderPlus, LuFiles as Explorer, LuUpload as Import, LuGlobe as Network,
        LuHammer as Compile, LuPencil as Rename, LuPlay as Play, LuPlus as Plus, LuRotateCcw as Retry,
        LuRocket as Deploy, LuSave as Save, LuScrollText as Logs, LuSearch as Search,
        LuPanelLeft as Sidebar, LuTerminal as Terminal, LuTrash2 as Trash, LuX as Close,
    };
}

mod bootstrap {
    pub use icondata::{
        BsChevronDown as ChevronDown, BsChevronRight as ChevronRight, BsClipboard as Copy, BsDownload as Download,
        BsFileEarmark as File, BsFileEarmarkPlus as FilePlus, BsFiles as Explorer,
        BsFolder2Open as FolderOpen, BsFolderFill as Folder, BsFolderPlus as FolderPlus,
        BsUpload as Import, BsGlobe as Network, BsHammer as Compile, BsJournalText as Logs,
        BsLayoutSidebar as Sidebar, BsPencil as Rename, BsPlayFill as Play, BsPlusLg as Plus,
        BsArrowClockwise as Retry,        BsRocketTakeoff as Deploy, BsSave as Save, BsSearch as Search, BsTerminal as Terminal,
        BsTrash as Trash, BsXLg as Close,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(CHEVRON_DOWN, ChevronDown);
themed_icon!(CHEVRON_RIGHT, ChevronRight);
themed_icon!(CLOSE, Close);
themed_icon!(COMPILE, Compile);
themed_icon!(COPY, Copy);
themed_icon!(DEPLOY, Deploy);
themed_icon!(DOWNLOAD, Download);
themed_icon!(EXPLORER, Explorer);
themed_icon!(FILE, File);
themed_icon!(FILE_PLUS, FilePlus);
themed_icon!(FOLDER, Folder);
themed_icon!(FOLDER_OPEN, FolderOpen);
themed_icon!(FOLDER_PLUS, FolderPlus);
themed_icon!(IMPORT, Import);
themed_icon!(LOGS, Logs);
themed_icon!(NETWORK, Network);
themed_icon!(PLAY, Play);
themed_icon!(PLUS, Plus);
themed_icon!(RENAME, Rename);
themed_icon!(RETRY, Retry);
themed_icon!(SAVE, Save);
themed_icon!(SEARCH, Search);
themed_icon!(SIDEBAR, Sidebar);
themed_icon!(TERMINAL, Terminal);
themed_icon!(TRASH, Trash);
