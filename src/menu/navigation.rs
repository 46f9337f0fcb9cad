//! Menu navigation engine.
//!
//! [`MenuContext`] owns the tree and a [`Cursor`], and implements the two
//! operator gestures:
//!
//! | Gesture | Effect |
//! |---|---|
//! | `advance` | next visible item of the current menu, wrapping to the first |
//! | `select`  | descend into a submenu, go back up, or activate a leaf |
//!
//! Before any index arithmetic the delegate's
//! [`prepare_for_render`](MenuDelegate::prepare_for_render) hook runs over
//! the whole tree so visibility is always current.  Each gesture returns
//! the item that should now be on screen; `None` means the screen stays
//! as it is.
//!
//! There is exactly one delegate per gesture, but it is passed in per call
//! rather than held by the context.  `BartenderService` owns the
//! `MenuContext` and builds its delegate from borrows of its own registry,
//! so a stored delegate would make the service borrow itself.

use log::{debug, warn};

use super::{MAX_MENU_DEPTH, Menu, MenuEntry, MenuError, MenuItem};

/// Hooks the engine calls into.
pub trait MenuDelegate<A> {
    /// Recompute visibility and names in place.  Runs before every render.
    fn prepare_for_render(&mut self, menu: &mut Menu<A>) -> bool;

    /// A leaf was selected.  Return `true` to re-render the current item.
    fn on_item_activated(&mut self, item: &MenuItem<A>) -> bool;
}

/// Where the operator is in the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Item indices of the submenus entered from the root.
    path: heapless::Vec<usize, MAX_MENU_DEPTH>,
    /// Position among the visible items of the current menu.
    index: usize,
}

impl Cursor {
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Submenu levels below the root.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    fn reset(&mut self) {
        self.path.clear();
        self.index = 0;
    }
}

pub struct MenuContext<A> {
    root: Menu<A>,
    cursor: Cursor,
}

impl<A> MenuContext<A> {
    /// Take ownership of a validated tree with the cursor on the first item.
    pub fn new(root: Menu<A>) -> Result<Self, MenuError> {
        root.validate_as_root()?;
        Ok(Self {
            root,
            cursor: Cursor::default(),
        })
    }

    pub fn root(&self) -> &Menu<A> {
        &self.root
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Menu the cursor is in.
    pub fn current_menu(&self) -> &Menu<A> {
        self.root.menu_at(&self.cursor.path).unwrap_or(&self.root)
    }

    /// Item under the cursor, if the current menu shows anything.
    pub fn current_item(&self) -> Option<&MenuItem<A>> {
        self.current_menu()
            .nth_visible(self.cursor.index)
            .map(|(_, item)| item)
    }

    /// Refresh the tree and return the item to display.
    ///
    /// Pulls the cursor back to the first item if the one it rested on
    /// has been hidden off the end.
    pub fn render(&mut self, delegate: &mut impl MenuDelegate<A>) -> Option<&MenuItem<A>> {
        delegate.prepare_for_render(&mut self.root);
        if self.root.menu_at(&self.cursor.path).is_none() {
            warn!("menu cursor path {:?} no longer valid, back to root", self.cursor.path);
            self.cursor.reset();
        }
        if self.cursor.index >= self.current_menu().visible_count() {
            self.cursor.index = 0;
        }
        self.current_item()
    }

    /// Move to the next visible item, wrapping around.
    pub fn advance(&mut self, delegate: &mut impl MenuDelegate<A>) -> Option<&MenuItem<A>> {
        delegate.prepare_for_render(&mut self.root);
        let count = self.current_menu().visible_count();
        if count == 0 {
            warn!("menu '{}' has nothing visible", self.current_menu().title());
            return None;
        }
        self.cursor.index = (self.cursor.index + 1) % count;
        self.render(delegate)
    }

    /// Activate the item under the cursor.
    pub fn select(&mut self, delegate: &mut impl MenuDelegate<A>) -> Option<&MenuItem<A>> {
        delegate.prepare_for_render(&mut self.root);
        let (index, kind) = {
            let Some((index, item)) = self.current_menu().nth_visible(self.cursor.index) else {
                warn!("menu '{}' has nothing to select", self.current_menu().title());
                return None;
            };
            let kind = match item.entry() {
                MenuEntry::SubMenu(_) => Selected::SubMenu,
                MenuEntry::Back => Selected::Back,
                MenuEntry::Action(_) => Selected::Action,
            };
            (index, kind)
        };

        match kind {
            Selected::SubMenu => {
                if self.cursor.path.push(index).is_err() {
                    warn!("menu nesting limit {} reached", MAX_MENU_DEPTH);
                    return None;
                }
                self.cursor.index = 0;
                debug!("MENU | enter '{}'", self.current_menu().title());
                self.render(delegate)
            }
            Selected::Back => {
                let Some(exited) = self.cursor.path.pop() else {
                    return None;
                };
                delegate.prepare_for_render(&mut self.root);
                self.cursor.index = self.current_menu().visible_position(exited).unwrap_or(0);
                debug!("MENU | back to '{}'", self.current_menu().title());
                self.render(delegate)
            }
            Selected::Action => {
                let Some(item) = self.current_menu().items().get(index) else {
                    return None;
                };
                if delegate.on_item_activated(item) {
                    self.render(delegate)
                } else {
                    None
                }
            }
        }
    }
}

enum Selected {
    SubMenu,
    Back,
    Action,
}
