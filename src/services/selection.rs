//! 文件选择 - 业务能力层
//!
//! 最多持有一个待分析文件，新选择直接替换旧选择，不做任何 I/O。

use crate::models::SelectedFile;
use phf::phf_set;
use tracing::{debug, warn};

/// 文件选择器建议接受的扩展名
static ACCEPTED_EXTENSIONS: phf::Set<&'static str> = phf_set! {
    "cpp",
    "h",
    "hpp",
};

/// 文件的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// 文件选择对话框，带扩展名过滤
    Picker,
    /// 拖放，无法过滤
    Drop,
}

impl InputSource {
    /// 该来源是否会交付此文件名
    pub fn admits(self, file_name: &str) -> bool {
        match self {
            InputSource::Drop => true,
            InputSource::Picker => has_accepted_extension(file_name),
        }
    }
}

/// 是否为 .cpp / .h / .hpp（不区分大小写）
pub fn has_accepted_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ACCEPTED_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 文件选择管理器
#[derive(Debug, Default)]
pub struct SelectionManager {
    current: Option<SelectedFile>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 无条件替换当前选择
    pub fn select(&mut self, file: SelectedFile) {
        if let Some(previous) = self.current.replace(file) {
            debug!("替换已选择的文件: {}", previous.name);
        }
    }

    /// 按来源选择，选择器会拒绝不在过滤列表中的文件
    ///
    /// 返回是否接受
    pub fn select_from(&mut self, file: SelectedFile, source: InputSource) -> bool {
        if !source.admits(&file.name) {
            warn!("⚠️ 文件选择器只接受 .cpp/.h/.hpp，已忽略: {}", file.name);
            return false;
        }
        if !has_accepted_extension(&file.name) {
            debug!("拖放的文件不在建议的扩展名内: {}", file.name);
        }
        self.select(file);
        true
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// 取出当前选择，之后为空
    pub fn take(&mut self) -> Option<SelectedFile> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&SelectedFile> {
        self.current.as_ref()
    }

    pub fn has_selection(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> SelectedFile {
        SelectedFile::from_bytes(name, vec![0; 10])
    }

    #[test]
    fn test_new_selection_replaces_old() {
        let mut manager = SelectionManager::new();
        manager.select(file("a.cpp"));
        manager.select(file("b.cpp"));

        assert_eq!(manager.current().map(|f| f.name.as_str()), Some("b.cpp"));
        assert!(manager.take().is_some());
        assert!(manager.take().is_none());
    }

    #[test]
    fn test_picker_filters_extensions() {
        let mut manager = SelectionManager::new();
        assert!(!manager.select_from(file("notes.txt"), InputSource::Picker));
        assert!(!manager.has_selection());

        assert!(manager.select_from(file("Widget.HPP"), InputSource::Picker));
        assert!(manager.has_selection());
    }

    #[test]
    fn test_drop_accepts_anything() {
        let mut manager = SelectionManager::new();
        assert!(manager.select_from(file("main.py"), InputSource::Drop));
        assert_eq!(manager.current().map(|f| f.name.as_str()), Some("main.py"));

        manager.clear();
        assert!(!manager.has_selection());
    }

    #[test]
    fn test_extension_matching() {
        assert!(has_accepted_extension("a.cpp"));
        assert!(has_accepted_extension("dir.v2/a.h"));
        assert!(!has_accepted_extension("cpp"));
        assert!(!has_accepted_extension("a.cpp.bak"));
        assert!(!has_accepted_extension("a.cc"));
    }
}
