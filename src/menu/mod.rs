//! Generic menu tree.
//!
//! A [`Menu`] owns an ordered list of [`MenuItem`]s.  An item is either a
//! leaf carrying an application payload `A`, a nested [`Menu`], or a
//! `Back` entry that returns to the enclosing menu.
//!
//! ```text
//! Main Menu
//! ├── Rum & Coke        Action(A)
//! ├── Screwdriver       Action(A)
//! └── Configure         SubMenu
//!     ├── Clean         Action(A)
//!     ├── Pump 1        SubMenu
//!     │   ├── Gin *     Action(A)
//!     │   └── Back
//!     └── Back
//! ```
//!
//! Ownership only flows downwards.  The way back up is the cursor's path
//! of item indices kept by [`navigation::MenuContext`], so no item ever
//! points at its parent.
//!
//! Item names and visibility are mutable so a delegate can hide entries
//! and annotate them before each render; the shape of the tree is fixed
//! once it is handed to a [`navigation::MenuContext`].

pub mod navigation;

use core::fmt;

use log::warn;

/// Deepest submenu nesting accepted below the root.
pub const MAX_MENU_DEPTH: usize = 16;

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// What activating an item does.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry<A> {
    /// Hand the payload to the delegate.
    Action(A),
    /// Descend into a nested menu.
    SubMenu(Menu<A>),
    /// Return to the enclosing menu.
    Back,
}

/// One selectable line of a menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem<A> {
    name: String,
    visible: bool,
    entry: MenuEntry<A>,
}

impl<A> MenuItem<A> {
    pub fn action(name: impl Into<String>, payload: A) -> Self {
        Self {
            name: name.into(),
            visible: true,
            entry: MenuEntry::Action(payload),
        }
    }

    pub fn back(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            entry: MenuEntry::Back,
        }
    }

    /// Wrap a menu as an item named after the menu's title.
    pub fn submenu(menu: Menu<A>) -> Self {
        Self {
            name: menu.title.clone(),
            visible: true,
            entry: MenuEntry::SubMenu(menu),
        }
    }

    /// Text shown when the cursor rests on this item.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn entry(&self) -> &MenuEntry<A> {
        &self.entry
    }

    /// Application payload of an `Action` item.
    pub fn payload(&self) -> Option<&A> {
        match &self.entry {
            MenuEntry::Action(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn as_submenu(&self) -> Option<&Menu<A>> {
        match &self.entry {
            MenuEntry::SubMenu(menu) => Some(menu),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Menu<A> {
    title: String,
    items: Vec<MenuItem<A>>,
}

impl<A> Menu<A> {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Append an item.  Insertion order is display order.
    pub fn add(&mut self, item: MenuItem<A>) -> &mut Self {
        self.items.push(item);
        self
    }

    pub fn add_action(&mut self, name: impl Into<String>, payload: A) -> &mut Self {
        self.add(MenuItem::action(name, payload))
    }

    pub fn add_submenu(&mut self, menu: Menu<A>) -> &mut Self {
        self.add(MenuItem::submenu(menu))
    }

    pub fn add_back(&mut self, name: impl Into<String>) -> &mut Self {
        self.add(MenuItem::back(name))
    }

    pub fn items(&self) -> &[MenuItem<A>] {
        &self.items
    }

    /// Nested menu held by the item at `index`.
    pub fn child(&self, index: usize) -> Option<&Menu<A>> {
        self.items.get(index).and_then(MenuItem::as_submenu)
    }

    /// Follow a path of item indices down from this menu.
    pub fn menu_at(&self, path: &[usize]) -> Option<&Menu<A>> {
        path.iter().try_fold(self, |menu, &index| menu.child(index))
    }

    /// Item indices of the currently visible items, in display order.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.visible)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.items.iter().filter(|item| item.visible).count()
    }

    /// The `n`th visible item and its index in [`items`](Self::items).
    pub fn nth_visible(&self, n: usize) -> Option<(usize, &MenuItem<A>)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.visible)
            .nth(n)
    }

    /// Position of item `index` among the visible items.
    pub fn visible_position(&self, index: usize) -> Option<usize> {
        self.visible_indices().iter().position(|&i| i == index)
    }

    /// Levels of submenus below this menu.
    pub fn depth(&self) -> usize {
        self.items
            .iter()
            .filter_map(MenuItem::as_submenu)
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Visit every item of this menu and all nested menus, parents first.
    ///
    /// Stops descending at [`MAX_MENU_DEPTH`].
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut MenuItem<A>)) {
        self.walk_mut_at(0, f);
    }

    fn walk_mut_at(&mut self, depth: usize, f: &mut impl FnMut(&mut MenuItem<A>)) {
        for item in &mut self.items {
            f(item);
            if let MenuEntry::SubMenu(child) = &mut item.entry {
                if depth < MAX_MENU_DEPTH {
                    child.walk_mut_at(depth + 1, f);
                } else {
                    warn!("menu '{}' nested deeper than {}, skipped", child.title, MAX_MENU_DEPTH);
                }
            }
        }
    }

    /// Structural checks run before a tree is navigated.
    ///
    /// The root has no `Back` item; every nested menu has at least one so
    /// the operator can always leave it.
    pub fn validate_as_root(&self) -> Result<(), MenuError> {
        if self.depth() > MAX_MENU_DEPTH {
            return Err(MenuError::TooDeep { limit: MAX_MENU_DEPTH });
        }
        if self.has_back() {
            return Err(MenuError::BackAtRoot);
        }
        self.validate_children()
    }

    fn validate_children(&self) -> Result<(), MenuError> {
        for child in self.items.iter().filter_map(MenuItem::as_submenu) {
            if !child.has_back() {
                return Err(MenuError::NoWayBack(child.title.clone()));
            }
            child.validate_children()?;
        }
        Ok(())
    }

    fn has_back(&self) -> bool {
        self.items.iter().any(|item| matches!(item.entry, MenuEntry::Back))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural problems in a menu tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// Submenus nest deeper than the limit.
    TooDeep { limit: usize },
    /// The root menu carries a `Back` item.
    BackAtRoot,
    /// A nested menu has no `Back` item.
    NoWayBack(String),
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooDeep { limit } => write!(f, "menus nested deeper than {limit}"),
            Self::BackAtRoot => write!(f, "root menu has a Back item"),
            Self::NoWayBack(title) => write!(f, "menu '{title}' has no Back item"),
        }
    }
}

impl std::error::Error for MenuError {}
