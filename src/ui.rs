use std::collections::{BTreeMap, BTreeSet};

/// Element hooks the controller and pipelines address.
pub mod hooks {
    pub const ROOT: &str = "root";
    pub const BODY: &str = "body";
    pub const ICON_WINDOW: &str = "layout-icon1";
    pub const ICON_MAIL: &str = "layout-icon2";
    pub const ACTIVE_ICON: &str = "active-icon";

    pub const MODAL_EMPLOYEE: &str = "modaleFile";
    pub const MODAL_ADMIN: &str = "modaleFileAdmin1";

    pub const FORM_NEW_BILL: &str = "form-new-bill";
    pub const EXPENSE_TYPE: &str = "expense-type";
    pub const EXPENSE_NAME: &str = "expense-name";
    pub const AMOUNT: &str = "amount";
    pub const DATE: &str = "datepicker";
    pub const VAT: &str = "vat";
    pub const PCT: &str = "pct";
    pub const COMMENTARY: &str = "commentary";
    pub const FILE: &str = "file";
    pub const FILE_ERROR: &str = "file-error-message";

    pub const ADMIN_COMMENT: &str = "commentary2";
    pub const DASHBOARD_RIGHT: &str = "dashboard-right-container";
    pub const VERTICAL_NAVBAR: &str = "vertical-navbar";

    pub fn arrow_icon(bucket: usize) -> String {
        format!("arrow-icon{bucket}")
    }

    pub fn bucket_container(bucket: usize) -> String {
        format!("status-bills-container{bucket}")
    }

    pub fn open_bill(id: &str) -> String {
        format!("open-bill{id}")
    }
}

/// The capability set screens are driven through.
pub trait Ui {
    /// Whether an element with this hook is mounted.
    fn query(&self, hook: &str) -> bool;
    fn set_content(&mut self, hook: &str, markup: &str);
    fn set_style(&mut self, hook: &str, props: &[(&str, &str)]);
    fn set_class(&mut self, hook: &str, class: &str, enabled: bool);
    fn read_value(&self, hook: &str) -> Option<String>;
    fn set_value(&mut self, hook: &str, value: &str);
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Element {
    pub content: String,
    pub styles: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub value: Option<String>,
}

/// An in-memory page: elements keyed by hook, created on first write.
#[derive(Debug, Default, Clone)]
pub struct Document {
    elements: BTreeMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, hook: &str) -> Option<&Element> {
        self.elements.get(hook)
    }

    pub fn content(&self, hook: &str) -> &str {
        self.elements
            .get(hook)
            .map(|e| e.content.as_str())
            .unwrap_or("")
    }

    pub fn style(&self, hook: &str, prop: &str) -> Option<&str> {
        self.elements
            .get(hook)
            .and_then(|e| e.styles.get(prop))
            .map(String::as_str)
    }

    pub fn has_class(&self, hook: &str, class: &str) -> bool {
        self.elements
            .get(hook)
            .is_some_and(|e| e.classes.contains(class))
    }

    fn entry(&mut self, hook: &str) -> &mut Element {
        self.elements.entry(hook.to_string()).or_default()
    }
}

impl Ui for Document {
    fn query(&self, hook: &str) -> bool {
        self.elements.contains_key(hook)
    }

    /// Replacing the root unmounts everything the previous screen put inside it.
    fn set_content(&mut self, hook: &str, markup: &str) {
        if hook == hooks::ROOT {
            self.elements.retain(|h, _| h == hooks::BODY);
        }
        self.entry(hook).content = markup.to_string();
    }

    fn set_style(&mut self, hook: &str, props: &[(&str, &str)]) {
        let el = self.entry(hook);
        for (k, v) in props {
            el.styles.insert(k.to_string(), v.to_string());
        }
    }

    fn set_class(&mut self, hook: &str, class: &str, enabled: bool) {
        let el = self.entry(hook);
        if enabled {
            el.classes.insert(class.to_string());
        } else {
            el.classes.remove(class);
        }
    }

    fn read_value(&self, hook: &str) -> Option<String> {
        self.elements.get(hook).and_then(|e| e.value.clone())
    }

    fn set_value(&mut self, hook: &str, value: &str) {
        self.entry(hook).value = Some(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creates_on_write() {
        let mut doc = Document::new();
        assert!(!doc.query(hooks::ROOT));
        doc.set_content(hooks::ROOT, "hello");
        assert!(doc.query(hooks::ROOT));
        assert_eq!(doc.content(hooks::ROOT), "hello");
    }

    #[test]
    fn test_classes_are_idempotent() {
        let mut doc = Document::new();
        doc.set_class(hooks::ICON_WINDOW, hooks::ACTIVE_ICON, true);
        doc.set_class(hooks::ICON_WINDOW, hooks::ACTIVE_ICON, true);
        assert!(doc.has_class(hooks::ICON_WINDOW, hooks::ACTIVE_ICON));
        doc.set_class(hooks::ICON_WINDOW, hooks::ACTIVE_ICON, false);
        assert!(!doc.has_class(hooks::ICON_WINDOW, hooks::ACTIVE_ICON));
    }

    #[test]
    fn test_root_replacement_unmounts_screen() {
        let mut doc = Document::new();
        doc.set_style(hooks::BODY, &[("background-color", "#0E5AE5")]);
        doc.set_value(hooks::AMOUNT, "42");
        doc.set_content(hooks::ROOT, "next screen");
        assert_eq!(doc.style(hooks::BODY, "background-color"), Some("#0E5AE5"));
        assert!(doc.read_value(hooks::AMOUNT).is_none());
        assert!(!doc.query(hooks::AMOUNT));
    }
}
