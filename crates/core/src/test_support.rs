//! In-memory `PullRequestProvider` shared by the unit tests.

use async_trait::async_trait;
use donotsubmit_developer_platforms::errors::Error;
use donotsubmit_developer_platforms::models::{FilePage, PageToken, PullRequestFile};
use donotsubmit_developer_platforms::PullRequestProvider;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::event::{PullRequestEvent, PullRequestRef, PullRequestState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelCall {
    Add(String),
    Remove(String),
}

#[derive(Debug, Default)]
pub struct FakeProvider {
    pages: HashMap<PageToken, FilePage>,
    failing_page: Option<PageToken>,
    fail_label_updates: bool,
    labels: Mutex<HashSet<String>>,
    requested_pages: Mutex<Vec<PageToken>>,
    label_calls: Mutex<Vec<LabelCall>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32, files: Vec<PullRequestFile>, next: Option<u32>) -> Self {
        self.pages.insert(
            PageToken(page),
            FilePage {
                files,
                next_page: next.map(PageToken),
            },
        );
        self
    }

    pub fn with_failing_page(mut self, page: u32) -> Self {
        self.failing_page = Some(PageToken(page));
        self
    }

    pub fn with_label_failure(mut self) -> Self {
        self.fail_label_updates = true;
        self
    }

    pub fn with_labels(self, labels: &[&str]) -> Self {
        {
            let mut current = self.labels.lock().unwrap();
            current.extend(labels.iter().map(|l| l.to_string()));
        }
        self
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested_pages
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.0)
            .collect()
    }

    pub fn label_calls(&self) -> Vec<LabelCall> {
        self.label_calls.lock().unwrap().clone()
    }

    /// Builds an event reflecting the labels the fake currently holds.
    pub fn snapshot(&self, state: PullRequestState) -> PullRequestEvent {
        PullRequestEvent {
            pull_request: pull_request_ref(),
            state,
            labels: self.labels.lock().unwrap().clone(),
        }
    }
}

#[async_trait]
impl PullRequestProvider for FakeProvider {
    async fn fetch_changed_files_page(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
        page: PageToken,
    ) -> Result<FilePage, Error> {
        self.requested_pages.lock().unwrap().push(page);
        if self.failing_page == Some(page) {
            return Err(Error::ApiError(format!("page {} unavailable", page)));
        }

        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }

    async fn add_labels(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
        labels: &[String],
    ) -> Result<(), Error> {
        let mut calls = self.label_calls.lock().unwrap();
        calls.extend(labels.iter().cloned().map(LabelCall::Add));
        if self.fail_label_updates {
            return Err(Error::FailedToUpdatePullRequest(
                "Failed to add labels".to_string(),
            ));
        }

        self.labels.lock().unwrap().extend(labels.iter().cloned());
        Ok(())
    }

    async fn remove_label(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
        label: &str,
    ) -> Result<(), Error> {
        self.label_calls
            .lock()
            .unwrap()
            .push(LabelCall::Remove(label.to_string()));
        if self.fail_label_updates {
            return Err(Error::FailedToUpdatePullRequest(
                "Failed to remove label".to_string(),
            ));
        }

        self.labels.lock().unwrap().remove(label);
        Ok(())
    }
}

pub fn pull_request_ref() -> PullRequestRef {
    PullRequestRef::new("owner", "repo", 1)
}

pub fn file(filename: &str, patch: Option<&str>) -> PullRequestFile {
    PullRequestFile {
        filename: filename.to_string(),
        patch: patch.map(|p| p.to_string()),
    }
}

pub const MARKED_PATCH: &str = "@@ -1,2 +1,3 @@\n context\n+DO NOT SUBMIT: temp hack\n-old line";

pub const CLEAN_PATCH: &str = "@@ -1,2 +1,2 @@\n context\n-old line\n+new line";

pub const MALFORMED_PATCH: &str = "this is not a diff\n+DO NOT SUBMIT";
