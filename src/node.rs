use crate::token::Token;

/// A node of the shallow parse tree. Whitespace and comments are leaves like
/// any other token, so walking the tree reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Token),
    Group(Group),
    List(ClauseList),
}

/// A parenthesized region. `close` is `None` when the input ended before the
/// matching `)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub open: Token,
    pub body: ClauseList,
    pub close: Option<Token>,
}

impl Group {
    pub fn is_unterminated(&self) -> bool {
        self.close.is_none()
    }
}

/// Comma-separated items at one nesting level. There is always at least one
/// (possibly empty) item, and `separators.len() == items.len() - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseList {
    pub items: Vec<Vec<Node>>,
    pub separators: Vec<Token>,
}

impl ClauseList {
    pub fn new() -> Self {
        Self {
            items: vec![Vec::new()],
            separators: Vec::new(),
        }
    }

    /// Append a node to the last item.
    pub fn push(&mut self, node: Node) {
        match self.items.last_mut() {
            Some(item) => item.push(node),
            None => self.items.push(vec![node]),
        }
    }

    /// Close the current item at `comma` and start a new one.
    pub fn separate(&mut self, comma: Token) {
        self.separators.push(comma);
        self.items.push(Vec::new());
    }

    pub fn is_empty(&self) -> bool {
        self.items.iter().all(Vec::is_empty) && self.separators.is_empty()
    }

    /// Interleave items and separators in document order.
    pub fn entries(&self) -> impl Iterator<Item = ListEntry<'_>> {
        self.items.iter().enumerate().flat_map(move |(i, item)| {
            let sep = self.separators.get(i).map(ListEntry::Separator);
            std::iter::once(ListEntry::Item(item.as_slice())).chain(sep)
        })
    }
}

impl Default for ClauseList {
    fn default() -> Self {
        Self::new()
    }
}

/// One step of walking a `ClauseList` in order.
#[derive(Debug, Clone, Copy)]
pub enum ListEntry<'a> {
    Item(&'a [Node]),
    Separator(&'a Token),
}

/// A token reached by [`Node::walk`], tagged with its structural role.
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    Token(&'a Token),
    /// A comma that separates two items of a `ClauseList`.
    Separator(&'a Token),
}

enum Step<'a> {
    Node(&'a Node),
    Visit(Visit<'a>),
}

impl Node {
    /// Visit every token in document order. Uses an explicit stack, so the
    /// nesting depth of the tree is bounded only by memory.
    pub fn walk<'a>(&'a self, mut f: impl FnMut(Visit<'a>)) {
        let mut stack: Vec<Step<'a>> = vec![Step::Node(self)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(visit) => f(visit),
                Step::Node(Node::Leaf(token)) => f(Visit::Token(token)),
                Step::Node(Node::Group(group)) => {
                    if let Some(close) = &group.close {
                        stack.push(Step::Visit(Visit::Token(close)));
                    }
                    push_list(&mut stack, &group.body);
                    stack.push(Step::Visit(Visit::Token(&group.open)));
                }
                Step::Node(Node::List(list)) => push_list(&mut stack, list),
            }
        }
    }

    pub fn walk_tokens<'a>(&'a self, f: &mut impl FnMut(&'a Token)) {
        self.walk(|visit| match visit {
            Visit::Token(token) | Visit::Separator(token) => f(token),
        });
    }

    pub fn tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        self.walk_tokens(&mut |t| tokens.push(t));
        tokens
    }

    /// Exact source text covered by this node.
    pub fn source_text(&self) -> String {
        let mut out = String::new();
        self.walk_tokens(&mut |t| out.push_str(&t.text));
        out
    }

    /// Deepest group nesting below this node.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, level)) = stack.pop() {
            let (list, level) = match node {
                Node::Leaf(_) => continue,
                Node::Group(group) => (&group.body, level + 1),
                Node::List(list) => (list, level),
            };
            deepest = deepest.max(level);
            stack.extend(list.items.iter().flatten().map(|n| (n, level)));
        }
        deepest
    }
}

/// Push the entries of `list` so they pop in document order.
fn push_list<'a>(stack: &mut Vec<Step<'a>>, list: &'a ClauseList) {
    for (i, item) in list.items.iter().enumerate().rev() {
        if let Some(comma) = list.separators.get(i) {
            stack.push(Step::Visit(Visit::Separator(comma)));
        }
        stack.extend(item.iter().rev().map(Step::Node));
    }
}

// Children are moved onto a heap stack before they drop, so tearing down a
// deeply nested tree never recurses.
impl Drop for ClauseList {
    fn drop(&mut self) {
        let mut pending: Vec<Node> = self.items.drain(..).flatten().collect();
        while let Some(node) = pending.pop() {
            match node {
                Node::Group(mut group) => pending.extend(group.body.items.drain(..).flatten()),
                Node::List(mut list) => pending.extend(list.items.drain(..).flatten()),
                Node::Leaf(_) => {}
            }
        }
    }
}
