/// File type categorisation based on file extensions.
///
/// Folds the scan's extension histogram into a handful of broad groups
/// (Documents, Images, Video, Audio, Archives, Code, Executables, System,
/// Other) with size and count totals per group.
use crate::model::ExtStat;
use std::collections::HashMap;

/// Broad file type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileCategory {
    Documents,
    Images,
    Video,
    Audio,
    Archives,
    Code,
    Executables,
    System,
    Other,
}

impl FileCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Code => "Code",
            Self::Executables => "Executables",
            Self::System => "System",
            Self::Other => "Other",
        }
    }
}

/// Size and count totals for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: FileCategory,
    pub bytes: u64,
    pub count: u64,
}

/// Map an extension (without the dot, any case) to its category.
///
/// Unknown extensions, the no-extension sentinel and anything that is not
/// plain ASCII fall into [`FileCategory::Other`].
pub fn categorise_extension(ext: &str) -> FileCategory {
    // Longer than any known extension; skip the lowercase copy.
    if ext.len() > 8 || !ext.is_ascii() {
        return FileCategory::Other;
    }
    let lower = ext.to_ascii_lowercase();

    match lower.as_str() {
        "doc" | "docx" | "pdf" | "txt" | "rtf" | "odt" | "ods" | "xls" | "xlsx" | "ppt"
        | "pptx" | "csv" | "md" | "epub" | "pages" => FileCategory::Documents,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "ico" | "tiff" | "tif"
        | "psd" | "raw" | "cr2" | "nef" | "heic" | "heif" => FileCategory::Images,
        "mp4" | "mkv" | "avi" | "mov" | "wmv" | "flv" | "webm" | "m4v" | "mpg" | "mpeg" | "3gp" => {
            FileCategory::Video
        }
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" | "m4a" | "opus" => FileCategory::Audio,
        "zip" | "rar" | "7z" | "tar" | "gz" | "tgz" | "bz2" | "xz" | "zst" | "cab" | "iso"
        | "dmg" | "deb" | "rpm" => FileCategory::Archives,
        "rs" | "py" | "js" | "ts" | "jsx" | "tsx" | "c" | "cpp" | "h" | "hpp" | "cs" | "java"
        | "go" | "rb" | "php" | "swift" | "kt" | "scala" | "html" | "css" | "scss" | "json"
        | "xml" | "yaml" | "yml" | "toml" | "sql" | "sh" | "bat" | "ps1" => FileCategory::Code,
        "exe" | "msi" | "dll" | "so" | "dylib" | "app" | "com" | "bin" | "appimage" => {
            FileCategory::Executables
        }
        "sys" | "drv" | "inf" | "log" | "etl" | "dat" | "reg" | "tmp" | "bak" | "cache"
        | "lock" => FileCategory::System,
        _ => FileCategory::Other,
    }
}

/// Per-category totals, largest first (ties in declaration order).
/// Categories with no files are omitted.
pub fn category_breakdown(ext_stats: &HashMap<String, ExtStat>) -> Vec<CategoryStats> {
    let mut totals: HashMap<FileCategory, CategoryStats> = HashMap::with_capacity(9);

    for (ext, stat) in ext_stats {
        if stat.count == 0 {
            continue;
        }
        let category = categorise_extension(ext);
        let entry = totals.entry(category).or_insert(CategoryStats {
            category,
            bytes: 0,
            count: 0,
        });
        entry.bytes += stat.bytes;
        entry.count += stat.count;
    }

    let mut results: Vec<CategoryStats> = totals.into_values().collect();
    results.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.category.cmp(&b.category)));
    results
}
