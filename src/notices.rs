use uuid::Uuid;

use crate::db::SchoolDb;
use crate::error::{DbError, Result};
use crate::model::{Notice, NoticeDraft, NoticePatch};
use crate::store::Collection;

impl SchoolDb {
    pub fn get_all_notices(&self) -> Vec<Notice> {
        self.read_collection(Collection::Notices)
    }

    pub fn add_notice(&mut self, draft: NoticeDraft) -> Result<Notice> {
        let mut notices: Vec<Notice> = self.read_collection(Collection::Notices);
        let notice = Notice {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            content: draft.content,
            pinned: draft.pinned,
            class: draft.class,
            expiry_date: draft.expiry_date,
            author: draft.author,
        };
        notices.push(notice.clone());
        self.write_collection(Collection::Notices, &notices)?;
        Ok(notice)
    }

    pub fn update_notice(&mut self, id: &str, patch: NoticePatch) -> Result<Notice> {
        let mut notices: Vec<Notice> = self.read_collection(Collection::Notices);
        let n = notices
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| DbError::NotFound {
                entity: "notice",
                id: id.to_string(),
            })?;
        if let Some(title) = patch.title {
            n.title = title;
        }
        if let Some(content) = patch.content {
            n.content = content;
        }
        if let Some(pinned) = patch.pinned {
            n.pinned = pinned;
        }
        if let Some(class) = patch.class {
            n.class = class;
        }
        if let Some(expiry) = patch.expiry_date {
            n.expiry_date = expiry;
        }
        let updated = n.clone();
        self.write_collection(Collection::Notices, &notices)?;
        Ok(updated)
    }

    pub fn delete_notice(&mut self, id: &str) -> Result<Notice> {
        let mut notices: Vec<Notice> = self.read_collection(Collection::Notices);
        let idx = notices
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| DbError::NotFound {
                entity: "notice",
                id: id.to_string(),
            })?;
        let removed = notices.remove(idx);
        self.write_collection(Collection::Notices, &notices)?;
        Ok(removed)
    }

    /// Unexpired notices visible to a class, pinned ones first. A notice
    /// with no class is visible everywhere.
    pub fn get_visible_notices(&self, class: Option<&str>, today: &str) -> Vec<Notice> {
        let mut visible: Vec<Notice> = self
            .get_all_notices()
            .into_iter()
            .filter(|n| n.expiry_date.as_str() >= today)
            .filter(|n| match (&n.class, class) {
                (None, _) => true,
                (Some(nc), Some(c)) => nc == c,
                (Some(_), None) => false,
            })
            .collect();
        visible.sort_by_key(|n| !n.pinned);
        visible
    }
}
