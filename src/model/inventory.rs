// src/model/inventory.rs

/// Result of one day's consumption on the first floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyUsage {
    /// Stock left after consumption; negative when the floor ran short.
    pub end_inventory: i32,
    pub shortage: i32,
}

/// Stock on the first floor and in the basement, plus the order in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryState {
    pub first_floor: i32,
    pub basement: i32,
    pub lead_time_remaining: u32,

    capacity: i32,
    floor_restock: i32,
}

impl InventoryState {
    /// Basement starts full.
    pub fn new(first_floor: i32, capacity: i32, floor_restock: i32) -> Self {
        Self {
            first_floor,
            basement: capacity,
            lead_time_remaining: 0,
            capacity,
            floor_restock,
        }
    }

    pub fn order_in_flight(&self) -> bool {
        self.lead_time_remaining > 0
    }

    /// Step 1: Use up today's consumption on the first floor.
    ///
    /// On a shortage the floor is topped up from the basement for the next
    /// day, and the basement loses a full restock's worth (or whatever is
    /// left) whatever the size of the shortfall.
    pub fn consume(&mut self, consumption: i32) -> DailyUsage {
        if self.first_floor >= consumption {
            self.first_floor -= consumption;
            return DailyUsage {
                end_inventory: self.first_floor,
                shortage: 0,
            };
        }

        let shortage = consumption - self.first_floor;
        self.first_floor = restocked_floor(shortage, self.floor_restock);
        self.basement -= self.floor_restock.min(self.basement);

        DailyUsage {
            end_inventory: -shortage,
            shortage,
        }
    }

    /// Step 2: Count down the order in flight.
    ///
    /// Returns `true` on the day the order arrives and the basement is
    /// refilled to capacity.
    pub fn advance_lead_time(&mut self) -> bool {
        if self.lead_time_remaining == 0 {
            return false;
        }
        self.lead_time_remaining -= 1;
        if self.lead_time_remaining == 0 {
            self.basement = self.capacity;
            return true;
        }
        false
    }

    /// Step 3: Place a replenishment order for the basement.
    ///
    /// Returns the quantity ordered.
    pub fn place_order(&mut self, lead_time: u32) -> i32 {
        self.lead_time_remaining = lead_time;
        self.capacity - self.basement
    }
}

/// Next-day first-floor stock after a shortage.
pub fn restocked_floor(shortage: i32, floor_restock: i32) -> i32 {
    if shortage <= floor_restock {
        floor_restock - shortage
    } else {
        0
    }
}

/// Next-day first-floor stock given the previous day's signed end inventory.
pub fn carry_over(end_inventory: i32, floor_restock: i32) -> i32 {
    if end_inventory >= 0 {
        end_inventory
    } else {
        restocked_floor(-end_inventory, floor_restock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumption_within_stock_has_no_shortage() {
        let mut state = InventoryState::new(4, 30, 10);
        let usage = state.consume(3);
        assert_eq!(
            usage,
            DailyUsage {
                end_inventory: 1,
                shortage: 0
            }
        );
        assert_eq!(state.first_floor, 1);
        assert_eq!(state.basement, 30);
    }

    #[test]
    fn shortage_restocks_floor_and_drains_basement() {
        let mut state = InventoryState::new(1, 30, 10);
        let usage = state.consume(4);
        assert_eq!(usage.end_inventory, -3);
        assert_eq!(usage.shortage, 3);
        assert_eq!(state.first_floor, 7);
        assert_eq!(state.basement, 20);
    }

    #[test]
    fn basement_never_goes_negative() {
        let mut state = InventoryState::new(0, 30, 10);
        state.basement = 4;
        state.consume(2);
        assert_eq!(state.basement, 0);
        state.first_floor = 0;
        state.consume(5);
        assert_eq!(state.basement, 0);
    }

    #[test]
    fn restock_clamps_large_shortages_to_zero() {
        assert_eq!(restocked_floor(3, 10), 7);
        assert_eq!(restocked_floor(10, 10), 0);
        assert_eq!(restocked_floor(12, 10), 0);
        assert_eq!(carry_over(5, 10), 5);
        assert_eq!(carry_over(-2, 10), 8);
    }

    #[test]
    fn order_arrives_when_countdown_hits_zero() {
        let mut state = InventoryState::new(4, 30, 10);
        state.basement = 12;
        assert_eq!(state.place_order(2), 18);
        assert!(state.order_in_flight());
        assert!(!state.advance_lead_time());
        assert_eq!(state.basement, 12);
        assert!(state.advance_lead_time());
        assert_eq!(state.basement, 30);
        assert!(!state.order_in_flight());
        assert!(!state.advance_lead_time());
    }
}
