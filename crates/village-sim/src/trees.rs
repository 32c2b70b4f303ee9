//! The default behavior trees, one per role.
//!
//! Trees are ordinary editable [`BehaviorTree`] values; these builders only
//! provide the starting point. Priority is encoded by selector order: fight
//! fires, then survive the night, hunger, and cold, then do the day job.

use village_bt::{BehaviorTree, NodeId, NodeKind};

use crate::actions::Action;
use crate::conditions::Condition;
use crate::economy::ItemKind;
use crate::villager::Role;

type Tree = BehaviorTree<Condition, Action>;

fn seq(tree: &mut Tree, parent: NodeId) -> Option<NodeId> {
    tree.add_child(parent, NodeKind::Sequence)
}

fn sel(tree: &mut Tree, parent: NodeId) -> Option<NodeId> {
    tree.add_child(parent, NodeKind::Selector)
}

fn cond(tree: &mut Tree, parent: NodeId, c: Condition) -> Option<NodeId> {
    tree.add_child(parent, NodeKind::Condition(c))
}

fn act(tree: &mut Tree, parent: NodeId, a: Action) -> Option<NodeId> {
    tree.add_child(parent, NodeKind::Action(a))
}

/// Fire response: throw water if carrying it, otherwise fetch some first.
fn fire_branch(tree: &mut Tree, root: NodeId) -> Option<()> {
    let branch = seq(tree, root)?;
    cond(tree, branch, Condition::FireActive)?;
    let response = sel(tree, branch)?;

    let douse = seq(tree, response)?;
    cond(tree, douse, Condition::HasWater)?;
    act(tree, douse, Action::GoToFire)?;
    act(tree, douse, Action::ExtinguishFire)?;

    let fetch = seq(tree, response)?;
    act(tree, fetch, Action::GoToWell)?;
    act(tree, fetch, Action::FetchWater)?;
    Some(())
}

fn sleep_branch(tree: &mut Tree, root: NodeId, trigger: Condition) -> Option<()> {
    let branch = seq(tree, root)?;
    cond(tree, branch, trigger)?;
    act(tree, branch, Action::GoToBed)?;
    act(tree, branch, Action::Sleep)?;
    Some(())
}

fn hunger_branch(tree: &mut Tree, root: NodeId) -> Option<()> {
    let branch = seq(tree, root)?;
    cond(tree, branch, Condition::IsHungry)?;
    let meal = sel(tree, branch)?;

    let bread = seq(tree, meal)?;
    cond(tree, bread, Condition::BreadAvailable)?;
    act(tree, bread, Action::EatBread)?;

    let fish = seq(tree, meal)?;
    cond(tree, fish, Condition::CookedFishAvailable)?;
    act(tree, fish, Action::EatCookedFish)?;
    Some(())
}

/// Cold response: put on a sweater when one exists, otherwise get to the
/// fireplace, lighting it first if it is out and wood is stored.
fn cold_branch(tree: &mut Tree, root: NodeId) -> Option<()> {
    let branch = seq(tree, root)?;
    cond(tree, branch, Condition::IsCold)?;
    let remedy = sel(tree, branch)?;

    let dress = seq(tree, remedy)?;
    cond(tree, dress, Condition::SweaterAvailable)?;
    act(tree, dress, Action::WearSweater)?;

    let warm = seq(tree, remedy)?;
    cond(tree, warm, Condition::FireplaceLit)?;
    act(tree, warm, Action::GoToFireplace)?;
    act(tree, warm, Action::WarmUp)?;

    let light = seq(tree, remedy)?;
    cond(tree, light, Condition::WoodStored)?;
    act(tree, light, Action::GoToFireplace)?;
    act(tree, light, Action::FuelFireplace)?;
    act(tree, light, Action::WarmUp)?;
    Some(())
}

fn farmer_work(tree: &mut Tree, work: NodeId) -> Option<()> {
    let harvest = seq(tree, work)?;
    cond(tree, harvest, Condition::FieldReadyExists)?;
    act(tree, harvest, Action::GoToField)?;
    act(tree, harvest, Action::HarvestCrop)?;

    let water = seq(tree, work)?;
    cond(tree, water, Condition::FieldNeedsWaterExists)?;
    act(tree, water, Action::GoToWateringField)?;
    act(tree, water, Action::WaterField)?;

    let plant = seq(tree, work)?;
    cond(tree, plant, Condition::EmptyFieldExists)?;
    act(tree, plant, Action::GoToEmptyField)?;
    act(tree, plant, Action::PlantCrop)?;
    Some(())
}

fn baker_work(tree: &mut Tree, work: NodeId) -> Option<()> {
    let bake = seq(tree, work)?;
    cond(tree, bake, Condition::Carrying(ItemKind::Flour))?;
    act(tree, bake, Action::GoToBakery)?;
    act(tree, bake, Action::BakeBread)?;

    let grind = seq(tree, work)?;
    cond(tree, grind, Condition::Carrying(ItemKind::Wheat))?;
    act(tree, grind, Action::GoToMill)?;
    act(tree, grind, Action::GrindWheat)?;

    let collect = seq(tree, work)?;
    cond(tree, collect, Condition::WheatStored)?;
    cond(tree, collect, Condition::CarryingNothing)?;
    act(tree, collect, Action::GoToBarn)?;
    act(tree, collect, Action::CollectWheat)?;
    Some(())
}

fn lumberjack_work(tree: &mut Tree, work: NodeId) -> Option<()> {
    let refuel = seq(tree, work)?;
    cond(tree, refuel, Condition::FireplaceNeedsFuel)?;
    cond(tree, refuel, Condition::WoodStored)?;
    act(tree, refuel, Action::GoToFireplace)?;
    act(tree, refuel, Action::FuelFireplace)?;

    let store = seq(tree, work)?;
    cond(tree, store, Condition::Carrying(ItemKind::Wood))?;
    act(tree, store, Action::GoToBarn)?;
    act(tree, store, Action::StoreWood)?;

    let chop = seq(tree, work)?;
    cond(tree, chop, Condition::GrownTreeExists)?;
    act(tree, chop, Action::GoToTree)?;
    act(tree, chop, Action::ChopWood)?;
    Some(())
}

fn shepherd_work(tree: &mut Tree, work: NodeId) -> Option<()> {
    let store = seq(tree, work)?;
    cond(tree, store, Condition::Carrying(ItemKind::Wool))?;
    act(tree, store, Action::GoToBarn)?;
    act(tree, store, Action::StoreWool)?;

    let knit = seq(tree, work)?;
    cond(tree, knit, Condition::WoolStored)?;
    act(tree, knit, Action::GoToKnittingHut)?;
    act(tree, knit, Action::KnitSweater)?;

    let shear = seq(tree, work)?;
    cond(tree, shear, Condition::WoollySheepExists)?;
    act(tree, shear, Action::GoToSheep)?;
    act(tree, shear, Action::ShearSheep)?;
    Some(())
}

fn fisher_work(tree: &mut Tree, work: NodeId) -> Option<()> {
    let store = seq(tree, work)?;
    cond(tree, store, Condition::Carrying(ItemKind::Fish))?;
    act(tree, store, Action::GoToBarn)?;
    act(tree, store, Action::StoreFish)?;

    let cook = seq(tree, work)?;
    cond(tree, cook, Condition::FishStored)?;
    cond(tree, cook, Condition::FireplaceLit)?;
    act(tree, cook, Action::GoToFireplace)?;
    act(tree, cook, Action::CookFish)?;

    let fish = seq(tree, work)?;
    act(tree, fish, Action::GoToPond)?;
    act(tree, fish, Action::Fish)?;
    Some(())
}

fn build(role: Role) -> Option<Tree> {
    let mut tree = Tree::new();
    let root = tree.set_root(NodeKind::Selector);

    fire_branch(&mut tree, root)?;
    sleep_branch(&mut tree, root, Condition::IsNight)?;
    hunger_branch(&mut tree, root)?;
    cold_branch(&mut tree, root)?;
    sleep_branch(&mut tree, root, Condition::IsTired)?;

    let work = sel(&mut tree, root)?;
    match role {
        Role::Farmer => farmer_work(&mut tree, work)?,
        Role::Baker => baker_work(&mut tree, work)?,
        Role::Lumberjack => lumberjack_work(&mut tree, work)?,
        Role::Shepherd => shepherd_work(&mut tree, work)?,
        Role::Fisher => fisher_work(&mut tree, work)?,
    }

    act(&mut tree, root, Action::Idle)?;
    Some(tree)
}

/// Build the default tree for a role. Attaching under a composite parent
/// cannot miss, so the fallback empty tree is unreachable in practice.
pub fn tree_for_role(role: Role) -> Tree {
    build(role).unwrap_or_default()
}
