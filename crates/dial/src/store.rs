use crate::countries::{Country, CountryError};
use crate::format;
use crate::plan::{Network, PlanType, VolumeUnit};
use crate::tariff::{Price, Tariff, TimeBudgets};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("At least two shortcuts are required, got {0}")]
    TooFewShortcuts(usize),
    #[error("Shortcut #{index} ({value}) is not a finite number")]
    NonFiniteShortcut { index: usize, value: f64 },
    #[error("Shortcuts must be strictly ascending: {previous} is followed by {value} at #{index}")]
    NotAscending {
        index: usize,
        previous: f64,
        value: f64,
    },
    #[error("Quantity {quantity} is outside the shortcut range [{min}, {max}]")]
    QuantityOutOfRange { quantity: f64, min: f64, max: f64 },
    #[error("Fraction {0} is outside [0, 1]")]
    FractionOutOfRange(f64),
    #[error(transparent)]
    Country(#[from] CountryError),
}

/// Index of the largest shortcut that does not exceed `quantity`, if any.
pub fn closest_index_not_above(shortcuts: &[f64], quantity: f64) -> Option<usize> {
    shortcuts
        .iter()
        .enumerate()
        .map(|(i, s)| (i, quantity - s))
        .filter(|(_, diff)| *diff >= 0.0)
        .fold(None, |best: Option<(usize, f64)>, (i, diff)| match best {
            Some((_, best_diff)) if best_diff <= diff => best,
            _ => Some((i, diff)),
        })
        .map(|(i, _)| i)
}

/// Preset quantities: at least two, finite and strictly ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutSet(Vec<f64>);

impl ShortcutSet {
    pub fn new(values: Vec<f64>) -> Result<Self, PlanError> {
        if values.len() < 2 {
            return Err(PlanError::TooFewShortcuts(values.len()));
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(PlanError::NonFiniteShortcut { index, value });
        }
        if let Some(index) = (1..values.len()).find(|&i| values[i] <= values[i - 1]) {
            return Err(PlanError::NotAscending {
                index,
                previous: values[index - 1],
                value: values[index],
            });
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn min(&self) -> f64 {
        self.0[0]
    }

    pub fn max(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    pub fn span(&self) -> f64 {
        self.max() - self.min()
    }

    pub fn contains(&self, quantity: f64) -> bool {
        (self.min()..=self.max()).contains(&quantity)
    }

    /// The shortcut exactly equal to `quantity`.
    pub fn exact(&self, quantity: f64) -> Option<f64> {
        self.0.iter().copied().find(|s| *s == quantity)
    }

    pub fn quantity_at(&self, fraction: f64) -> f64 {
        (self.min() + fraction * self.span()).clamp(self.min(), self.max())
    }

    pub fn fraction_of(&self, quantity: f64) -> f64 {
        (quantity - self.min()) / self.span()
    }

    pub fn closest_index_not_above(&self, quantity: f64) -> Option<usize> {
        closest_index_not_above(&self.0, quantity)
    }
}

/// Everything about a plan that does not depend on the selected volume.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanProfile {
    pub unit: VolumeUnit,
    pub country: Country,
    pub network: Network,
    pub plan_type: PlanType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanSelection {
    pub quantity: f64,
    pub fraction: f64,
    pub shortcuts: ShortcutSet,
    pub budgets: TimeBudgets,
    pub price: Price,
    pub unit: VolumeUnit,
    pub country: Country,
    pub network: Network,
    pub plan_type: PlanType,
}

impl PlanSelection {
    /// Shortcut chip to highlight for the current quantity.
    pub fn active_shortcut(&self) -> Option<usize> {
        self.shortcuts.closest_index_not_above(self.quantity)
    }

    pub fn volume_label(&self) -> String {
        format::volume(self.quantity, &self.unit)
    }
}

pub type Observer = Box<dyn FnMut(&PlanSelection)>;

/// Owner of the selected plan. Every change replaces the snapshot and is handed to all
/// observers, in registration order, before the mutating call returns.
pub struct PlanStore {
    selection: PlanSelection,
    tariff: Tariff,
    observers: Vec<Observer>,
    version: u64,
}

impl PlanStore {
    pub fn new(shortcuts: ShortcutSet, tariff: Tariff, profile: PlanProfile) -> Self {
        let quantity = shortcuts.min();
        let selection = PlanSelection {
            quantity,
            fraction: 0.0,
            budgets: tariff.budgets(quantity),
            price: tariff.price(quantity),
            shortcuts,
            unit: profile.unit,
            country: profile.country,
            network: profile.network,
            plan_type: profile.plan_type,
        };

        Self {
            selection,
            tariff,
            observers: Vec::new(),
            version: 0,
        }
    }

    pub fn snapshot(&self) -> &PlanSelection {
        &self.selection
    }

    /// Number of snapshots published so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&PlanSelection) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Maps a dial position onto the shortcut range, snapping to a preset when the rounded
    /// quantity equals one.
    pub fn set_by_fraction(&mut self, fraction: f64) -> Result<(), PlanError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(PlanError::FractionOutOfRange(fraction));
        }

        let shortcuts = &self.selection.shortcuts;
        let quantity = shortcuts.quantity_at(fraction);
        if let Some(preset) = shortcuts.exact(format::round_one_decimal(quantity)) {
            log::debug!("Snapping {quantity} to shortcut {preset}");
            return self.set_by_quantity(preset);
        }

        self.publish(PlanSelection {
            quantity,
            fraction,
            ..self.selection.clone()
        });
        Ok(())
    }

    pub fn set_by_quantity(&mut self, quantity: f64) -> Result<(), PlanError> {
        let shortcuts = &self.selection.shortcuts;
        if !shortcuts.contains(quantity) {
            return Err(PlanError::QuantityOutOfRange {
                quantity,
                min: shortcuts.min(),
                max: shortcuts.max(),
            });
        }

        let fraction = shortcuts.fraction_of(quantity);
        self.publish(PlanSelection {
            quantity,
            fraction,
            ..self.selection.clone()
        });
        Ok(())
    }

    pub fn select_country(&mut self, country: Country) {
        if self.selection.country == country {
            return;
        }
        self.publish(PlanSelection {
            country,
            ..self.selection.clone()
        });
    }

    /// Swaps in new presets and pricing, keeping the quantity when it is still in range and
    /// falling back to the nearest end of the new range otherwise.
    pub fn reconfigure(&mut self, shortcuts: ShortcutSet, tariff: Tariff, profile: PlanProfile) {
        let quantity = self
            .selection
            .quantity
            .clamp(shortcuts.min(), shortcuts.max());
        self.tariff = tariff;
        self.publish(PlanSelection {
            quantity,
            fraction: shortcuts.fraction_of(quantity),
            shortcuts,
            unit: profile.unit,
            country: profile.country,
            network: profile.network,
            plan_type: profile.plan_type,
            ..self.selection.clone()
        });
    }

    fn publish(&mut self, mut next: PlanSelection) {
        next.budgets = self.tariff.budgets(next.quantity);
        next.price = self.tariff.price(next.quantity);
        self.selection = next;
        self.version += 1;

        log::debug!(
            "Published v{}: {} ({:.3}) for {}",
            self.version,
            self.selection.volume_label(),
            self.selection.fraction,
            self.selection.price
        );

        for observer in &mut self.observers {
            observer(&self.selection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::CountryCatalog;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn profile() -> PlanProfile {
        let catalog = CountryCatalog::builtin().unwrap();
        PlanProfile {
            unit: VolumeUnit::default(),
            country: catalog.find(&"SE".parse().unwrap()).unwrap().clone(),
            network: Network::default(),
            plan_type: PlanType::default(),
        }
    }

    fn store() -> PlanStore {
        let shortcuts = ShortcutSet::new(vec![5.0, 10.0, 15.0, 20.0]).unwrap();
        PlanStore::new(shortcuts, Tariff::default(), profile())
    }

    #[test]
    fn test_shortcut_validation() {
        assert!(matches!(
            ShortcutSet::new(vec![5.0]),
            Err(PlanError::TooFewShortcuts(1))
        ));
        assert!(matches!(
            ShortcutSet::new(vec![5.0, 15.0, 10.0]),
            Err(PlanError::NotAscending { index: 2, .. })
        ));
        assert!(matches!(
            ShortcutSet::new(vec![5.0, 5.0]),
            Err(PlanError::NotAscending { index: 1, .. })
        ));
        assert!(matches!(
            ShortcutSet::new(vec![1.0, f64::NAN]),
            Err(PlanError::NonFiniteShortcut { index: 1, .. })
        ));
        assert!(ShortcutSet::new(vec![0.5, 1.0]).is_ok());
    }

    #[test]
    fn test_initial_selection_is_smallest_shortcut() {
        let store = store();
        let selection = store.snapshot();

        assert_eq!(selection.quantity, 5.0);
        assert_eq!(selection.fraction, 0.0);
        assert_eq!(selection.budgets.internet_hours, 30);
        assert_eq!(selection.price.to_string(), "45 KR");
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_set_by_fraction_stays_in_range() {
        let mut store = store();
        for step in 0..=1000 {
            let fraction = step as f64 / 1000.0;
            store.set_by_fraction(fraction).unwrap();
            let quantity = store.snapshot().quantity;
            assert!((5.0..=20.0).contains(&quantity), "{fraction} -> {quantity}");
        }
    }

    #[test]
    fn test_set_by_fraction_rejects_out_of_range() {
        let mut store = store();
        for fraction in [-0.01, 1.01, f64::NAN] {
            assert!(matches!(
                store.set_by_fraction(fraction),
                Err(PlanError::FractionOutOfRange(_))
            ));
        }
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_snap_to_shortcut() {
        let mut store = store();
        store.set_by_fraction((10.0 - 5.0) / (20.0 - 5.0)).unwrap();

        let selection = store.snapshot();
        assert_eq!(selection.quantity, 10.0);
        assert_eq!(selection.fraction, 5.0 / 15.0);
        assert_eq!(selection.active_shortcut(), Some(1));
    }

    #[test]
    fn test_snap_when_label_rounds_to_shortcut() {
        let mut store = store();
        // 5 + 0.6646 * 15 = 14.969, shown as "15"
        store.set_by_fraction(0.6646).unwrap();

        let selection = store.snapshot();
        assert_eq!(selection.quantity, 15.0);
        assert_eq!(selection.fraction, 10.0 / 15.0);
    }

    #[test]
    fn test_half_way_label_rounds_up_to_shortcut() {
        let shortcuts = ShortcutSet::new(vec![0.0, 0.3, 1.0]).unwrap();
        let mut store = PlanStore::new(shortcuts, Tariff::default(), profile());

        // 0.25 reads "0.3"
        store.set_by_fraction(0.25).unwrap();
        assert_eq!(store.snapshot().quantity, 0.3);
        assert_eq!(store.snapshot().fraction, 0.3);
    }

    #[test]
    fn test_unsnapped_fraction_is_kept_verbatim() {
        let mut store = store();
        store.set_by_fraction(0.5).unwrap();

        let selection = store.snapshot();
        assert_eq!(selection.quantity, 12.5);
        assert_eq!(selection.fraction, 0.5);
        assert_eq!(selection.volume_label(), "12.5 GB");
        assert_eq!(selection.budgets.internet_hours, 75);
        assert_eq!(selection.budgets.music_hours, 37);
        assert_eq!(selection.budgets.video_hours, 12);
        assert_eq!(selection.price.to_string(), "97 KR");
    }

    #[test]
    fn test_set_by_quantity_round_trip() {
        let mut store = store();
        for quantity in [5.0, 5.2, 7.7, 10.0, 13.3, 19.9, 20.0] {
            store.set_by_quantity(quantity).unwrap();
            let selection = store.snapshot();
            let back = selection.shortcuts.quantity_at(selection.fraction);
            assert!((back - quantity).abs() < 0.05, "{quantity} -> {back}");
        }
    }

    #[test]
    fn test_set_by_quantity_derives_fields() {
        let mut store = store();
        store.set_by_quantity(5.2).unwrap();

        let selection = store.snapshot();
        assert_eq!(selection.budgets.internet_hours, 31);
        assert_eq!(selection.budgets.music_hours, 15);
        assert_eq!(selection.budgets.video_hours, 5);
        assert_eq!(selection.price.to_string(), "46 KR");
    }

    #[test]
    fn test_set_by_quantity_rejects_out_of_range() {
        let mut store = store();
        match store.set_by_quantity(25.0) {
            Err(PlanError::QuantityOutOfRange { quantity, min, max }) => {
                assert_eq!((quantity, min, max), (25.0, 5.0, 20.0));
            }
            other => panic!("expected a range error, got {other:?}"),
        }
        assert!(store.set_by_quantity(4.9).is_err());
        assert_eq!(store.snapshot().quantity, 5.0);
    }

    #[test]
    fn test_closest_index_not_above() {
        let shortcuts = [5.0, 10.0, 15.0, 20.0];
        assert_eq!(closest_index_not_above(&shortcuts, 12.0), Some(1));
        assert_eq!(closest_index_not_above(&shortcuts, 10.0), Some(1));
        assert_eq!(closest_index_not_above(&shortcuts, 20.0), Some(3));
        assert_eq!(closest_index_not_above(&shortcuts, 25.0), Some(3));
        assert_eq!(closest_index_not_above(&shortcuts, 4.9), None);
        assert_eq!(closest_index_not_above(&[], 4.9), None);
    }

    #[test]
    fn test_observers_see_every_publish_in_order() {
        let mut store = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            store.subscribe(move |s| seen.borrow_mut().push(s.quantity));
        }

        store.set_by_fraction(0.5).unwrap();
        store.set_by_quantity(20.0).unwrap();
        store.set_by_fraction(1.0 / 3.0).unwrap();
        assert!(store.set_by_quantity(30.0).is_err());

        assert_eq!(*seen.borrow(), vec![12.5, 20.0, 10.0]);
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn test_select_country_publishes_once() {
        let mut store = store();
        let brazil = CountryCatalog::builtin()
            .unwrap()
            .find(&"BR".parse().unwrap())
            .unwrap()
            .clone();

        store.select_country(brazil.clone());
        store.select_country(brazil.clone());

        assert_eq!(store.snapshot().country, brazil);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_reconfigure_clamps_quantity() {
        let mut store = store();
        store.set_by_quantity(20.0).unwrap();

        let shortcuts = ShortcutSet::new(vec![1.0, 2.0, 4.0, 8.0]).unwrap();
        store.reconfigure(shortcuts, Tariff::default(), profile());

        let selection = store.snapshot();
        assert_eq!(selection.quantity, 8.0);
        assert_eq!(selection.fraction, 1.0);
        assert_eq!(selection.active_shortcut(), Some(3));
        assert_eq!(selection.price.to_string(), "66 KR");
    }
}
