//! Fixtures shared by the parsing benchmarks.

/// Which parser a fixture is meant for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, file: TestFile) -> Self {
        Self { name, group, file }
    }

    pub fn small(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Small, file)
    }

    pub fn normal(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Normal, file)
    }

    pub fn large(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Large, file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn kind(&self) -> MessageKind {
        self.file.kind
    }
}

/// A wire-format message embedded at compile time.
#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    kind: MessageKind,
    content: &'static str,
}

impl TestFile {
    pub const fn request(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, kind: MessageKind::Request, content }
    }

    pub const fn response(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, kind: MessageKind::Response, content }
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.content.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

impl TestGroup {
    /// Criterion sample size; larger inputs take fewer samples.
    pub fn sample_size(self) -> usize {
        match self {
            TestGroup::Small => 200,
            TestGroup::Normal => 100,
            TestGroup::Large => 50,
        }
    }
}
