use std::fmt;

/// Named regions the renderer assembles the final HTML from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentGroup {
    Head,
    Body,
    BodyPrepend,
    BodyAppend,
}

impl FragmentGroup {
    pub const ALL: [FragmentGroup; 4] = [
        FragmentGroup::Body,
        FragmentGroup::BodyAppend,
        FragmentGroup::BodyPrepend,
        FragmentGroup::Head,
    ];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FragmentGroup::Head => "head",
            FragmentGroup::Body => "body",
            FragmentGroup::BodyPrepend => "bodyPrepend",
            FragmentGroup::BodyAppend => "bodyAppend",
        }
    }
}

impl fmt::Display for FragmentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The document of one response as four ordered groups of fragments.
#[derive(Debug, Clone)]
pub struct DocumentSections<F> {
    head: Vec<F>,
    body: Vec<F>,
    body_prepend: Vec<F>,
    body_append: Vec<F>,
}

impl<F> Default for DocumentSections<F> {
    fn default() -> Self {
        Self {
            head: Vec::new(),
            body: Vec::new(),
            body_prepend: Vec::new(),
            body_append: Vec::new(),
        }
    }
}

impl<F> DocumentSections<F> {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with(mut self, group: FragmentGroup, fragment: F) -> Self {
        self.push(group, fragment);
        self
    }

    #[inline]
    pub fn push(&mut self, group: FragmentGroup, fragment: F) {
        self.group_mut(group).push(fragment);
    }

    pub fn group(&self, group: FragmentGroup) -> &[F] {
        match group {
            FragmentGroup::Head => &self.head,
            FragmentGroup::Body => &self.body,
            FragmentGroup::BodyPrepend => &self.body_prepend,
            FragmentGroup::BodyAppend => &self.body_append,
        }
    }

    pub fn group_mut(&mut self, group: FragmentGroup) -> &mut Vec<F> {
        match group {
            FragmentGroup::Head => &mut self.head,
            FragmentGroup::Body => &mut self.body,
            FragmentGroup::BodyPrepend => &mut self.body_prepend,
            FragmentGroup::BodyAppend => &mut self.body_append,
        }
    }

    pub fn fragments(&self) -> impl Iterator<Item = &F> {
        self.body
            .iter()
            .chain(&self.body_append)
            .chain(&self.body_prepend)
            .chain(&self.head)
    }

    pub fn fragments_mut(&mut self) -> impl Iterator<Item = &mut F> {
        self.body
            .iter_mut()
            .chain(self.body_append.iter_mut())
            .chain(self.body_prepend.iter_mut())
            .chain(self.head.iter_mut())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.head.len() + self.body.len() + self.body_prepend.len() + self.body_append.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
