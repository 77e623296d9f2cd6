//! Transfer engine: listing, delisting, browsing and buying players

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::player::{Player, PlayerId, PlayerRepository};
use crate::domain::storage::TransactionalStore;
use crate::domain::team::{Team, TeamRepository};
use crate::domain::transfer::{appreciate, AppreciationSource, TransferReceipt, MAX_PLAYER_VALUE};
use crate::domain::user::UserId;
use crate::domain::{DomainError, ErrorCode};

/// Largest asking price a `NUMERIC(14,2)` column can hold
pub const MAX_ASKING_PRICE: Decimal = MAX_PLAYER_VALUE;

/// Transfer market operations
#[derive(Debug)]
pub struct TransferService {
    teams: Arc<dyn TeamRepository>,
    players: Arc<dyn PlayerRepository>,
    store: Arc<dyn TransactionalStore>,
    appreciation: Arc<dyn AppreciationSource>,
}

impl TransferService {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        players: Arc<dyn PlayerRepository>,
        store: Arc<dyn TransactionalStore>,
        appreciation: Arc<dyn AppreciationSource>,
    ) -> Self {
        Self {
            teams,
            players,
            store,
            appreciation,
        }
    }

    async fn own_team(&self, user_id: UserId) -> Result<Team, DomainError> {
        self.teams
            .get_by_owner(user_id)
            .await?
            .ok_or_else(DomainError::team_not_found)
    }

    /// Put one of the caller's players on the market at `price`
    ///
    /// Listing an already listed player replaces its asking price.
    pub async fn list_for_sale(
        &self,
        user_id: UserId,
        player_id: PlayerId,
        price: Decimal,
    ) -> Result<Player, DomainError> {
        let price = price.round_dp(2);
        if price <= Decimal::ZERO || price > MAX_ASKING_PRICE {
            return Err(DomainError::validation(ErrorCode::InvalidPrice));
        }

        let team = self.own_team(user_id).await?;

        let mut tx = self.store.begin().await?;
        let mut player = tx
            .lock_player(player_id)
            .await?
            .ok_or_else(DomainError::player_not_found)?;

        if !player.is_owned_by(team.id()) {
            warn!(player_id = %player_id, team_id = %team.id(), "Listing rejected: not owner");
            return Err(DomainError::not_owned());
        }

        tx.set_listing(player_id, Some(price)).await?;
        tx.commit().await?;

        player.list(price);
        info!(player_id = %player_id, price = %price, "Player listed for sale");
        Ok(player)
    }

    /// Take one of the caller's players off the market
    pub async fn remove_from_sale(
        &self,
        user_id: UserId,
        player_id: PlayerId,
    ) -> Result<Player, DomainError> {
        let team = self.own_team(user_id).await?;

        let mut tx = self.store.begin().await?;
        let mut player = tx
            .lock_player(player_id)
            .await?
            .ok_or_else(DomainError::player_not_found)?;

        if !player.is_owned_by(team.id()) {
            warn!(player_id = %player_id, team_id = %team.id(), "Delisting rejected: not owner");
            return Err(DomainError::not_owned());
        }
        if !player.on_transfer_list() {
            return Err(DomainError::not_listed());
        }

        tx.set_listing(player_id, None).await?;
        tx.commit().await?;

        player.delist();
        info!(player_id = %player_id, "Player removed from sale");
        Ok(player)
    }

    /// Every listed player, ordered by player ID
    pub async fn get_market(&self) -> Result<Vec<Player>, DomainError> {
        let players = self.players.list_on_market().await?;
        debug!(listed = players.len(), "Loaded transfer market");
        Ok(players)
    }

    /// Buy a listed player for its asking price
    ///
    /// Checks run once up front for fast feedback and again under row locks,
    /// so concurrent buyers of the same listing cannot both succeed.
    pub async fn buy(
        &self,
        buyer_user_id: UserId,
        player_id: PlayerId,
    ) -> Result<TransferReceipt, DomainError> {
        let buyer = self.own_team(buyer_user_id).await?;
        let player = self
            .players
            .get(player_id)
            .await?
            .ok_or_else(DomainError::player_not_found)?;

        check_purchase(&buyer, &player)?;

        let mut tx = self.store.begin().await?;

        let player = tx
            .lock_player(player_id)
            .await?
            .ok_or_else(DomainError::player_not_found)?;

        let seller_id = player.team_id();
        let buyer_id = buyer.id();
        if seller_id == buyer_id {
            return Err(DomainError::self_transfer());
        }

        let (first, second) = if buyer_id < seller_id {
            (buyer_id, seller_id)
        } else {
            (seller_id, buyer_id)
        };
        let first = tx.lock_team(first).await?.ok_or_else(DomainError::team_not_found)?;
        let second = tx.lock_team(second).await?.ok_or_else(DomainError::team_not_found)?;
        let buyer = if first.id() == buyer_id { first } else { second };

        check_purchase(&buyer, &player)?;

        let price = player.market_price();
        let new_base_value = appreciate(player.base_value(), self.appreciation.factor());

        tx.adjust_budget(buyer_id, -price).await?;
        tx.adjust_budget(seller_id, price).await?;
        tx.transfer_player(player_id, buyer_id, new_base_value).await?;
        tx.commit().await?;

        info!(
            player_id = %player_id,
            seller_team_id = %seller_id,
            buyer_team_id = %buyer_id,
            price = %price,
            new_base_value = %new_base_value,
            "Player transferred"
        );

        Ok(TransferReceipt {
            player_id,
            seller_team_id: seller_id,
            buyer_team_id: buyer_id,
            price,
            new_base_value,
        })
    }
}

/// Business rules of a purchase, in the order callers see them
fn check_purchase(buyer: &Team, player: &Player) -> Result<(), DomainError> {
    if !player.on_transfer_list() {
        return Err(DomainError::not_listed());
    }
    if !buyer.can_afford(player.market_price()) {
        return Err(DomainError::insufficient_funds());
    }
    if player.is_owned_by(buyer.id()) {
        return Err(DomainError::self_transfer());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transfer::{FixedAppreciation, RandomAppreciation};
    use crate::infrastructure::registration::Registration;
    use crate::infrastructure::storage::FailurePoint;
    use crate::infrastructure::testing::TestContext;
    use rust_decimal_macros::dec;

    async fn listed_player(ctx: &TestContext, seller: &Registration, price: Decimal) -> Player {
        let player = ctx.squad(seller).await.remove(0);
        ctx.transfers
            .list_for_sale(seller.user_id, player.id(), price)
            .await
            .unwrap()
    }

    async fn set_budget(ctx: &TestContext, registration: &Registration, budget: Decimal) {
        let current = ctx.team(registration).await.budget();
        let mut tx = ctx.stores.transactions.begin().await.unwrap();
        tx.adjust_budget(registration.team_id, budget - current)
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_list_and_remove() {
        let ctx = TestContext::new();
        let seller = ctx.register("a@example.com").await;

        let player = listed_player(&ctx, &seller, dec!(2000000)).await;
        assert!(player.on_transfer_list());
        assert_eq!(player.market_price(), dec!(2000000));

        let market = ctx.transfers.get_market().await.unwrap();
        assert_eq!(market, vec![player.clone()]);

        let removed = ctx
            .transfers
            .remove_from_sale(seller.user_id, player.id())
            .await
            .unwrap();
        assert!(!removed.on_transfer_list());
        assert_eq!(removed.market_price(), Decimal::ZERO);
        assert!(ctx.transfers.get_market().await.unwrap().is_empty());

        let err = ctx
            .transfers
            .remove_from_sale(seller.user_id, player.id())
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PlayerNotForSale);
    }

    #[tokio::test]
    async fn test_list_requires_positive_price() {
        let ctx = TestContext::new();
        let seller = ctx.register("a@example.com").await;
        let player = ctx.squad(&seller).await.remove(0);

        for price in [Decimal::ZERO, dec!(-5), dec!(0.001), dec!(1000000000000)] {
            let err = ctx
                .transfers
                .list_for_sale(seller.user_id, player.id(), price)
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidPrice);
        }

        assert!(ctx.transfers.get_market().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_foreign_or_missing_player() {
        let ctx = TestContext::new();
        let alice = ctx.register("a@example.com").await;
        let bob = ctx.register("b@example.com").await;
        let bobs_player = ctx.squad(&bob).await.remove(0);

        let err = ctx
            .transfers
            .list_for_sale(alice.user_id, bobs_player.id(), dec!(10))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DoNotOwnPlayer);

        let err = ctx
            .transfers
            .list_for_sale(alice.user_id, PlayerId::new(9999), dec!(10))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PlayerNotFound);

        let err = ctx
            .transfers
            .list_for_sale(UserId::new(9999), bobs_player.id(), dec!(10))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::TeamNotFound);
    }

    #[tokio::test]
    async fn test_buy_success() {
        let ctx = TestContext::with_appreciation(Arc::new(FixedAppreciation::new(dec!(1.5))));
        let seller = ctx.register("a@example.com").await;
        let buyer = ctx.register("b@example.com").await;
        let player = listed_player(&ctx, &seller, dec!(2000000)).await;
        let seller_before = ctx.team(&seller).await.budget();

        let receipt = ctx.transfers.buy(buyer.user_id, player.id()).await.unwrap();

        assert_eq!(receipt.price, dec!(2000000));
        assert_eq!(receipt.new_base_value, dec!(1500000));
        assert_eq!(receipt.seller_team_id, seller.team_id);
        assert_eq!(receipt.buyer_team_id, buyer.team_id);

        assert_eq!(ctx.team(&buyer).await.budget(), dec!(3000000));
        assert_eq!(ctx.team(&seller).await.budget(), seller_before + dec!(2000000));

        let moved = ctx.stores.players.get(player.id()).await.unwrap().unwrap();
        assert_eq!(moved.team_id(), buyer.team_id);
        assert!(!moved.on_transfer_list());
        assert_eq!(moved.market_price(), Decimal::ZERO);
        assert_eq!(moved.base_value(), dec!(1500000));

        assert!(ctx.transfers.get_market().await.unwrap().is_empty());
        assert_eq!(ctx.squad(&buyer).await.len(), 21);
        assert_eq!(ctx.squad(&seller).await.len(), 19);
    }

    #[tokio::test]
    async fn test_random_appreciation_stays_in_range() {
        let ctx = TestContext::with_appreciation(Arc::new(RandomAppreciation::new()));
        let seller = ctx.register("a@example.com").await;
        let buyer = ctx.register("b@example.com").await;
        let player = listed_player(&ctx, &seller, dec!(2000000)).await;

        let receipt = ctx.transfers.buy(buyer.user_id, player.id()).await.unwrap();

        assert!(receipt.new_base_value >= dec!(1100000));
        assert!(receipt.new_base_value < dec!(2000000));
    }

    #[tokio::test]
    async fn test_buy_with_insufficient_funds_changes_nothing() {
        let ctx = TestContext::new();
        let seller = ctx.register("a@example.com").await;
        let buyer = ctx.register("b@example.com").await;
        let player = listed_player(&ctx, &seller, dec!(2000000)).await;
        set_budget(&ctx, &buyer, dec!(1000000)).await;
        let seller_before = ctx.team(&seller).await.budget();

        let err = ctx.transfers.buy(buyer.user_id, player.id()).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::InsufficientFunds);
        assert_eq!(ctx.team(&buyer).await.budget(), dec!(1000000));
        assert_eq!(ctx.team(&seller).await.budget(), seller_before);
        assert_eq!(
            ctx.stores.players.get(player.id()).await.unwrap().unwrap(),
            player
        );
    }

    #[tokio::test]
    async fn test_buy_rule_failures() {
        let ctx = TestContext::new();
        let seller = ctx.register("a@example.com").await;
        let buyer = ctx.register("b@example.com").await;
        let listed = listed_player(&ctx, &seller, dec!(100)).await;
        let unlisted = ctx.squad(&seller).await.remove(1);

        let own = ctx.transfers.buy(seller.user_id, listed.id()).await.unwrap_err();
        assert_eq!(own.code(), ErrorCode::OwnPlayerBuy);

        let not_listed = ctx.transfers.buy(buyer.user_id, unlisted.id()).await.unwrap_err();
        assert_eq!(not_listed.code(), ErrorCode::PlayerNotForSale);

        let missing = ctx.transfers.buy(buyer.user_id, PlayerId::new(9999)).await.unwrap_err();
        assert_eq!(missing.code(), ErrorCode::PlayerNotFound);

        let no_team = ctx.transfers.buy(UserId::new(9999), listed.id()).await.unwrap_err();
        assert_eq!(no_team.code(), ErrorCode::TeamNotFound);
    }

    #[tokio::test]
    async fn test_failed_transfer_rolls_back_budgets() {
        let ctx = TestContext::new();
        let seller = ctx.register("a@example.com").await;
        let buyer = ctx.register("b@example.com").await;
        let player = listed_player(&ctx, &seller, dec!(2000000)).await;
        let total_before = ctx.total_budget(&[&seller, &buyer]).await;

        ctx.store.fail_on(FailurePoint::TransferPlayer).await.unwrap();
        let err = ctx.transfers.buy(buyer.user_id, player.id()).await.unwrap_err();
        assert!(err.is_infrastructure());

        assert_eq!(ctx.total_budget(&[&seller, &buyer]).await, total_before);
        assert_eq!(ctx.team(&buyer).await.budget(), dec!(5000000));
        let unchanged = ctx.stores.players.get(player.id()).await.unwrap().unwrap();
        assert_eq!(unchanged, player);
    }

    #[tokio::test]
    async fn test_money_is_conserved_across_purchases() {
        let ctx = TestContext::with_appreciation(Arc::new(RandomAppreciation::new()));
        let a = ctx.register("a@example.com").await;
        let b = ctx.register("b@example.com").await;
        let c = ctx.register("c@example.com").await;
        let total_before = ctx.total_budget(&[&a, &b, &c]).await;

        let p1 = listed_player(&ctx, &a, dec!(1234567.89)).await;
        ctx.transfers.buy(b.user_id, p1.id()).await.unwrap();

        let p2 = ctx
            .transfers
            .list_for_sale(b.user_id, p1.id(), dec!(2500000.01))
            .await
            .unwrap();
        ctx.transfers.buy(c.user_id, p2.id()).await.unwrap();

        assert_eq!(ctx.total_budget(&[&a, &b, &c]).await, total_before);
        assert_eq!(ctx.team(&a).await.budget(), dec!(5000000) + dec!(1234567.89));
        assert_eq!(
            ctx.team(&b).await.budget(),
            dec!(5000000) - dec!(1234567.89) + dec!(2500000.01)
        );
        assert_eq!(ctx.team(&c).await.budget(), dec!(5000000) - dec!(2500000.01));

        let mut holders = 0;
        for registration in [&a, &b, &c] {
            if ctx.squad(registration).await.iter().any(|p| p.id() == p1.id()) {
                holders += 1;
                assert_eq!(registration.team_id, c.team_id);
            }
        }
        assert_eq!(holders, 1);
    }

    #[tokio::test]
    async fn test_repeated_resales_cap_base_value() {
        let ctx = TestContext::with_appreciation(Arc::new(FixedAppreciation::new(dec!(1.9999))));
        let a = ctx.register("a@example.com").await;
        let b = ctx.register("b@example.com").await;
        let player_id = ctx.squad(&a).await[0].id();

        let mut owners = [&a, &b];
        let mut last = Decimal::ZERO;
        for _ in 0..80 {
            let [seller, buyer] = owners;
            ctx.transfers
                .list_for_sale(seller.user_id, player_id, dec!(0.01))
                .await
                .unwrap();
            let receipt = ctx.transfers.buy(buyer.user_id, player_id).await.unwrap();

            assert!(receipt.new_base_value <= MAX_PLAYER_VALUE);
            assert!(receipt.new_base_value >= last);
            last = receipt.new_base_value;
            owners = [buyer, seller];
        }

        assert_eq!(last, MAX_PLAYER_VALUE);
        let player = ctx.stores.players.get(player_id).await.unwrap().unwrap();
        assert_eq!(player.base_value(), MAX_PLAYER_VALUE);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_buyers_cannot_both_win() {
        let ctx = Arc::new(TestContext::new());
        let seller = ctx.register("seller@example.com").await;
        let player = listed_player(&ctx, &seller, dec!(2000000)).await;

        let mut buyers = Vec::new();
        for i in 0..6 {
            buyers.push(ctx.register(&format!("buyer{}@example.com", i)).await);
        }

        let handles: Vec<_> = buyers
            .iter()
            .map(|buyer| {
                let ctx = Arc::clone(&ctx);
                let user_id = buyer.user_id;
                let player_id = player.id();
                tokio::spawn(async move { ctx.transfers.buy(user_id, player_id).await })
            })
            .collect();

        let mut receipts = Vec::new();
        for handle in handles {
            match handle.await.unwrap() {
                Ok(receipt) => receipts.push(receipt),
                Err(err) => assert_eq!(err.code(), ErrorCode::PlayerNotForSale),
            }
        }

        assert_eq!(receipts.len(), 1);
        let winner = receipts[0].buyer_team_id;

        let mut all: Vec<&Registration> = buyers.iter().collect();
        all.push(&seller);
        let total = ctx.total_budget(&all).await;
        assert_eq!(total, dec!(5000000) * Decimal::from(all.len() as u64));

        let owned = ctx.stores.players.get(player.id()).await.unwrap().unwrap();
        assert_eq!(owned.team_id(), winner);
        assert!(!owned.on_transfer_list());
        assert_eq!(ctx.team(&seller).await.budget(), dec!(7000000));
    }
}
