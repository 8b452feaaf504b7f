use crate::config;
use crate::events::AppEvent;
use crate::gui::selector::{self, FRAME_INTERVAL_MS, State};
use crate::gui::theme;
use dial::format;
use dial::geometry::{Bounds, Point};
use dial::store::PlanSelection;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use strum::AsRefStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Page {
    Data,
    Countries,
    Success,
}

pub struct AppModel {
    pub state: Rc<RefCell<State>>,
    pub selection: PlanSelection,
    pub page: Page,
    pub receipt: String,
    pub drawing_area: gtk::DrawingArea,
    pub chips: gtk::Box,
    pub chip_buttons: Vec<gtk::Button>,
    pub country_list: gtk::ListBox,
    ticker: Option<glib::SourceId>,
    last_frame: Instant,
}

#[derive(Debug)]
pub enum AppMsg {
    Resize(i32, i32),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    DialChanged(f64),
    Published(PlanSelection),
    Tick,
    Shortcut(usize),
    ShowPage(Page),
    Search(String),
    CountryActivated(i32),
    Buy,
    OpenSettings,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (State, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Data plan"),
            set_default_size: (420, 760),

            #[name = "stack"]
            gtk::Stack {
                set_transition_type: gtk::StackTransitionType::SlideLeftRight,
                #[watch]
                set_visible_child_name: model.page.as_ref(),

                add_named[Some(Page::Data.as_ref())] = &gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 12,
                    set_margin_all: 16,

                    gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,

                        gtk::Button {
                            add_css_class: "flat",
                            #[watch]
                            set_label: &model.selection.country.label(),
                            connect_clicked => AppMsg::ShowPage(Page::Countries),
                        },
                        gtk::Button {
                            set_icon_name: "emblem-system-symbolic",
                            set_tooltip_text: Some("Edit configuration"),
                            set_hexpand: true,
                            set_halign: gtk::Align::End,
                            add_css_class: "flat",
                            connect_clicked => AppMsg::OpenSettings,
                        },
                    },

                    gtk::Label {
                        add_css_class: "dim-label",
                        #[watch]
                        set_label: &format!(
                            "{} · {}",
                            model.selection.network,
                            model.selection.plan_type
                        ),
                    },

                    gtk::Overlay {
                        #[name = "drawing_area"]
                        gtk::DrawingArea {
                            set_content_width: 320,
                            set_content_height: 320,
                            set_hexpand: true,
                            set_vexpand: true,

                            connect_resize[sender] => move |_, width, height| {
                                sender.input(AppMsg::Resize(width, height));
                            },

                            add_controller = gtk::GestureDrag {
                                connect_drag_begin[sender] => move |_, x, y| {
                                    sender.input(AppMsg::PointerDown(Point::new(x, y)));
                                },
                                connect_drag_update[sender] => move |gesture, dx, dy| {
                                    if let Some((x, y)) = gesture.start_point() {
                                        sender.input(AppMsg::PointerMove(Point::new(x + dx, y + dy)));
                                    }
                                },
                                connect_drag_end[sender] => move |_, _, _| {
                                    sender.input(AppMsg::PointerUp);
                                },
                            },
                        },

                        add_overlay = &gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_halign: gtk::Align::Center,
                            set_valign: gtk::Align::Center,
                            set_can_target: false,

                            gtk::Label {
                                add_css_class: "dial-volume",
                                #[watch]
                                set_label: &model.selection.volume_label(),
                            },
                            gtk::Label {
                                add_css_class: "dial-price",
                                #[watch]
                                set_label: &model.selection.price.to_string(),
                            },
                        },
                    },

                    #[name = "chips"]
                    gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_spacing: 8,
                        set_halign: gtk::Align::Center,
                    },

                    gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_homogeneous: true,

                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            gtk::Label {
                                add_css_class: "budget-value",
                                #[watch]
                                set_label: &format!("{} h", model.selection.budgets.internet_hours),
                            },
                            gtk::Label { set_label: "Internet", add_css_class: "dim-label" },
                        },
                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            gtk::Label {
                                add_css_class: "budget-value",
                                #[watch]
                                set_label: &format!("{} h", model.selection.budgets.music_hours),
                            },
                            gtk::Label { set_label: "Music", add_css_class: "dim-label" },
                        },
                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            gtk::Label {
                                add_css_class: "budget-value",
                                #[watch]
                                set_label: &format!("{} h", model.selection.budgets.video_hours),
                            },
                            gtk::Label { set_label: "Video", add_css_class: "dim-label" },
                        },
                    },

                    gtk::Button {
                        set_label: "Buy",
                        add_css_class: "suggested-action",
                        add_css_class: "pill",
                        connect_clicked => AppMsg::Buy,
                    },
                },

                add_named[Some(Page::Countries.as_ref())] = &gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 12,
                    set_margin_all: 16,

                    gtk::Box {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_spacing: 8,

                        gtk::Button {
                            set_icon_name: "go-previous-symbolic",
                            add_css_class: "flat",
                            connect_clicked => AppMsg::ShowPage(Page::Data),
                        },
                        gtk::Label {
                            set_label: "Choose a country",
                            set_hexpand: true,
                            set_xalign: 0.0,
                        },
                    },

                    gtk::SearchEntry {
                        set_placeholder_text: Some("Search"),
                        connect_search_changed[sender] => move |entry| {
                            sender.input(AppMsg::Search(entry.text().to_string()));
                        },
                    },

                    gtk::ScrolledWindow {
                        set_vexpand: true,

                        #[name = "country_list"]
                        gtk::ListBox {
                            connect_row_activated[sender] => move |_, row| {
                                sender.input(AppMsg::CountryActivated(row.index()));
                            },
                        },
                    },
                },

                add_named[Some(Page::Success.as_ref())] = &gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 16,
                    set_margin_all: 16,
                    set_valign: gtk::Align::Center,

                    gtk::Label {
                        set_label: "Success!",
                        add_css_class: "title-1",
                    },
                    gtk::Label {
                        #[watch]
                        set_label: &model.receipt,
                    },
                    gtk::Button {
                        set_label: "Done",
                        set_halign: gtk::Align::Center,
                        add_css_class: "pill",
                        connect_clicked => AppMsg::ShowPage(Page::Data),
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (mut state, rx) = init;

        theme::load_css();

        // Both directions go through the message queue so neither callback re-enters the
        // state while it is borrowed.
        {
            let sender = sender.clone();
            state
                .control
                .on_change(move |fraction| sender.input(AppMsg::DialChanged(fraction)));
        }
        {
            let sender = sender.clone();
            state
                .store
                .subscribe(move |selection| sender.input(AppMsg::Published(selection.clone())));
        }

        let selection = state.selection().clone();
        let state = Rc::new(RefCell::new(state));

        let model = AppModel {
            state: state.clone(),
            selection,
            page: Page::Data,
            receipt: String::new(),
            drawing_area: gtk::DrawingArea::default(),
            chips: gtk::Box::default(),
            chip_buttons: Vec::new(),
            country_list: gtk::ListBox::default(),
            ticker: None,
            last_frame: Instant::now(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        model.chips = widgets.chips.clone();
        model.country_list = widgets.country_list.clone();
        model.rebuild_chips(&sender);
        model.rebuild_country_list();

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let palette = theme::dial_palette(&drawing_area.style_context());
                let commands = state_draw.borrow().control.draw_commands(&palette);
                if let Err(e) = selector::draw(cr, &commands) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Resize(width, height) => {
                self.state
                    .borrow_mut()
                    .control
                    .resize(Bounds::new(width as f64, height as f64));
                self.drawing_area.queue_draw();
            }
            AppMsg::PointerDown(point) => {
                let response = self.state.borrow_mut().control.pointer_down(point);
                if response.should_redraw() {
                    self.stop_ticker();
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::PointerMove(point) => {
                let response = self.state.borrow_mut().control.pointer_move(point);
                if response.should_redraw() {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::PointerUp => {
                self.state.borrow_mut().control.pointer_up();
            }
            AppMsg::DialChanged(fraction) => {
                if let Err(e) = self.state.borrow_mut().dial_moved(fraction) {
                    log::warn!("Ignoring dial position {}: {}", fraction, e);
                }
            }
            AppMsg::Published(selection) => {
                let animating = self
                    .state
                    .borrow_mut()
                    .follow_selection(selection.fraction);
                if animating {
                    self.start_ticker(&sender);
                }
                let shortcuts_changed = selection.shortcuts != self.selection.shortcuts
                    || selection.unit != self.selection.unit;
                self.selection = selection;
                if shortcuts_changed {
                    self.rebuild_chips(&sender);
                } else {
                    self.highlight_chips();
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::Tick => {
                let now = Instant::now();
                let dt = now.duration_since(self.last_frame);
                self.last_frame = now;

                let running = self.state.borrow_mut().control.tick(dt);
                self.drawing_area.queue_draw();
                if !running {
                    self.stop_ticker();
                }
            }
            AppMsg::Shortcut(index) => {
                if let Err(e) = self.state.borrow_mut().select_shortcut(index) {
                    log::error!("Failed to select shortcut {}: {}", index, e);
                }
            }
            AppMsg::ShowPage(page) => {
                self.page = page;
            }
            AppMsg::Search(text) => {
                self.state.borrow_mut().picker.update_search(&text);
                self.rebuild_country_list();
            }
            AppMsg::CountryActivated(index) => {
                let Ok(index) = usize::try_from(index) else {
                    return;
                };
                if let Err(e) = self.state.borrow_mut().select_country(index) {
                    log::error!("Failed to select country: {}", e);
                    return;
                }
                self.rebuild_country_list();
                self.page = Page::Data;
            }
            AppMsg::Buy => {
                self.receipt = self.state.borrow().receipt();
                log::info!("Bought {}", self.receipt);
                self.page = Page::Success;
            }
            AppMsg::OpenSettings => match config::write_default_config() {
                Ok(path) => {
                    if let Err(e) = std::process::Command::new("xdg-open").arg(&path).spawn() {
                        log::error!("Failed to open {}: {}", path.display(), e);
                    }
                }
                Err(e) => log::error!("Failed to write default config: {}", e),
            },
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => match self.state.borrow_mut().reload(&new_config) {
                    Ok(()) => log::info!("Configuration reloaded"),
                    Err(e) => log::error!("Rejected reloaded config: {}", e),
                },
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    fn start_ticker(&mut self, sender: &ComponentSender<Self>) {
        if self.ticker.is_some() {
            return;
        }
        self.last_frame = Instant::now();
        let sender = sender.clone();
        self.ticker = Some(glib::timeout_add_local(
            Duration::from_millis(FRAME_INTERVAL_MS),
            move || {
                sender.input(AppMsg::Tick);
                glib::ControlFlow::Continue
            },
        ));
    }

    fn stop_ticker(&mut self) {
        if let Some(id) = self.ticker.take() {
            id.remove();
        }
    }

    fn rebuild_chips(&mut self, sender: &ComponentSender<Self>) {
        while let Some(child) = self.chips.first_child() {
            self.chips.remove(&child);
        }

        self.chip_buttons = self
            .selection
            .shortcuts
            .values()
            .iter()
            .enumerate()
            .map(|(index, &quantity)| {
                let label = format::volume(quantity, &self.selection.unit);
                let button = gtk::Button::with_label(&label);
                button.add_css_class("shortcut-chip");
                let sender = sender.clone();
                button.connect_clicked(move |_| sender.input(AppMsg::Shortcut(index)));
                self.chips.append(&button);
                button
            })
            .collect();

        self.highlight_chips();
    }

    fn highlight_chips(&self) {
        let active = self.selection.active_shortcut();
        for (index, button) in self.chip_buttons.iter().enumerate() {
            if active == Some(index) {
                button.add_css_class("active");
            } else {
                button.remove_css_class("active");
            }
        }
    }

    fn rebuild_country_list(&self) {
        while let Some(child) = self.country_list.first_child() {
            self.country_list.remove(&child);
        }

        let state = self.state.borrow();
        for country in state.picker.results() {
            let row = gtk::Box::new(gtk::Orientation::Horizontal, 8);
            row.set_margin_all(8);

            let label = gtk::Label::new(Some(&country.label()));
            label.set_hexpand(true);
            label.set_xalign(0.0);
            row.append(&label);

            if state.picker.is_selected(country) {
                row.append(&gtk::Image::from_icon_name("object-select-symbolic"));
            }
            self.country_list.append(&row);
        }
    }
}
