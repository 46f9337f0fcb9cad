//! The navigation engine driven with a payload type of its own, the way a
//! second appliance would embed it.

use bartender::menu::navigation::{MenuContext, MenuDelegate};
use bartender::menu::{MAX_MENU_DEPTH, Menu, MenuError, MenuItem};

#[derive(Debug, Clone, PartialEq)]
enum Setting {
    Brightness(u8),
    Language(&'static str),
}

/// Hides brightness levels above `max_brightness` and records activations.
struct Settings {
    max_brightness: u8,
    chosen: Vec<Setting>,
}

impl MenuDelegate<Setting> for Settings {
    fn prepare_for_render(&mut self, menu: &mut Menu<Setting>) -> bool {
        let max = self.max_brightness;
        menu.walk_mut(&mut |item: &mut MenuItem<Setting>| {
            if let Some(Setting::Brightness(level)) = item.payload() {
                let visible = *level <= max;
                item.set_visible(visible);
            }
        });
        true
    }

    fn on_item_activated(&mut self, item: &MenuItem<Setting>) -> bool {
        if let Some(setting) = item.payload() {
            self.chosen.push(setting.clone());
        }
        true
    }
}

fn settings_tree() -> Menu<Setting> {
    let mut brightness = Menu::new("Brightness");
    for level in [25, 50, 75, 100] {
        brightness.add_action(format!("{level}%"), Setting::Brightness(level));
    }
    brightness.add_back("Back");

    let mut language = Menu::new("Language");
    language
        .add_action("English", Setting::Language("en"))
        .add_action("Deutsch", Setting::Language("de"))
        .add_back("Back");

    let mut root = Menu::new("Settings");
    root.add_submenu(brightness).add_submenu(language);
    root
}

fn name(item: Option<&MenuItem<Setting>>) -> String {
    item.map(|i| i.name().to_string()).unwrap_or_default()
}

#[test]
fn walk_through_nested_menus() {
    let mut ctx = MenuContext::new(settings_tree()).unwrap();
    let mut d = Settings { max_brightness: 50, chosen: Vec::new() };

    assert_eq!(name(ctx.render(&mut d)), "Brightness");
    assert_eq!(name(ctx.select(&mut d)), "25%");
    assert_eq!(name(ctx.advance(&mut d)), "50%");
    assert_eq!(name(ctx.advance(&mut d)), "Back");
    assert_eq!(name(ctx.advance(&mut d)), "25%");

    ctx.advance(&mut d);
    assert_eq!(name(ctx.select(&mut d)), "50%");
    assert_eq!(d.chosen, [Setting::Brightness(50)]);
}

#[test]
fn back_lands_on_the_submenu_item() {
    let mut ctx = MenuContext::new(settings_tree()).unwrap();
    let mut d = Settings { max_brightness: 100, chosen: Vec::new() };
    ctx.render(&mut d);
    ctx.advance(&mut d);
    assert_eq!(name(ctx.select(&mut d)), "English");
    ctx.advance(&mut d);
    ctx.advance(&mut d);
    assert_eq!(name(ctx.select(&mut d)), "Language");
    assert_eq!(ctx.cursor().index(), 1);
    assert_eq!(ctx.cursor().depth(), 0);
}

#[test]
fn wraparound_returns_to_start() {
    let mut ctx = MenuContext::new(settings_tree()).unwrap();
    let mut d = Settings { max_brightness: 75, chosen: Vec::new() };
    ctx.render(&mut d);
    ctx.select(&mut d);
    let count = ctx.current_menu().visible_count();
    assert_eq!(count, 4);
    for _ in 0..count {
        ctx.advance(&mut d);
    }
    assert_eq!(ctx.cursor().index(), 0);
    assert_eq!(name(ctx.current_item()), "25%");
}

#[test]
fn shrinking_visibility_pulls_cursor_back() {
    let mut ctx = MenuContext::new(settings_tree()).unwrap();
    let mut d = Settings { max_brightness: 100, chosen: Vec::new() };
    ctx.render(&mut d);
    ctx.select(&mut d);
    for _ in 0..3 {
        ctx.advance(&mut d);
    }
    assert_eq!(name(ctx.current_item()), "100%");

    // Only "25%" and "Back" remain: index 3 is past the end.
    d.max_brightness = 25;
    assert_eq!(name(ctx.render(&mut d)), "25%");
}

#[test]
fn structural_errors_rejected_up_front() {
    let mut dead_end = Menu::new("Settings");
    dead_end.add_submenu(Menu::<Setting>::new("Empty"));
    assert!(matches!(
        MenuContext::new(dead_end),
        Err(MenuError::NoWayBack(title)) if title == "Empty"
    ));

    let mut menu = Menu::<Setting>::new("deepest");
    menu.add_back("Back");
    for level in 0..MAX_MENU_DEPTH {
        let mut parent = Menu::new(format!("level {level}"));
        parent.add_submenu(menu).add_back("Back");
        menu = parent;
    }
    let mut root = Menu::new("root");
    root.add_submenu(menu);
    assert!(matches!(MenuContext::new(root), Err(MenuError::TooDeep { .. })));
}
