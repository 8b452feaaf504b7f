use dial::control::DialControl;
use dial::countries::{CountryCatalog, CountryPicker};
use dial::plan::PlanConfig;
use dial::store::{PlanError, PlanSelection, PlanStore};

/// Everything behind the data page: the dial, the plan it edits and the country list.
pub struct State {
    pub control: DialControl,
    pub store: PlanStore,
    pub picker: CountryPicker,
}

impl State {
    pub fn new(config: &PlanConfig) -> Result<Self, PlanError> {
        let catalog = CountryCatalog::builtin()?;
        let store = config.build_store(catalog)?;
        let selection = store.snapshot();

        Ok(Self {
            control: DialControl::new(selection.fraction, config.dial),
            picker: CountryPicker::new(catalog.clone(), selection.country.clone()),
            store,
        })
    }

    pub fn selection(&self) -> &PlanSelection {
        self.store.snapshot()
    }

    /// Applies a changed config file. The country the user picked survives the reload; on
    /// error nothing changes.
    pub fn reload(&mut self, config: &PlanConfig) -> Result<(), PlanError> {
        let catalog = CountryCatalog::builtin()?;
        let shortcuts = config.shortcut_set()?;
        let mut profile = config.profile(catalog)?;
        profile.country = self.picker.selected().clone();

        self.store.reconfigure(shortcuts, config.tariff.clone(), profile);
        self.control.set_style(config.dial);
        Ok(())
    }

    /// Writes a dragged position into the store and moves the thumb to the result at once,
    /// so a snap shows up on the same frame.
    pub fn dial_moved(&mut self, fraction: f64) -> Result<(), PlanError> {
        self.store.set_by_fraction(fraction)?;
        self.control.set_selection(self.store.snapshot().fraction);
        Ok(())
    }

    /// Brings the dial to a published selection. Ignored mid-drag: `dial_moved` already
    /// placed the thumb, and a queued snapshot may predate the latest pointer position.
    /// Returns whether the dial has to animate.
    pub fn follow_selection(&mut self, fraction: f64) -> bool {
        if !self.control.is_dragging() {
            self.control.set_selection(fraction);
        }
        self.control.is_animating()
    }

    pub fn select_shortcut(&mut self, index: usize) -> Result<(), PlanError> {
        match self.selection().shortcuts.values().get(index) {
            Some(&quantity) => self.store.set_by_quantity(quantity),
            None => Ok(()),
        }
    }

    /// Picks the country at `index` of the current search results.
    pub fn select_country(&mut self, index: usize) -> Result<(), PlanError> {
        let Some(code) = self.picker.results().get(index).map(|c| c.code.clone()) else {
            return Ok(());
        };
        let country = self.picker.select(&code)?;
        self.store.select_country(country);
        Ok(())
    }

    pub fn receipt(&self) -> String {
        let selection = self.selection();
        format!(
            "{} for {} in {}",
            selection.volume_label(),
            selection.price,
            selection.country.name
        )
    }
}
