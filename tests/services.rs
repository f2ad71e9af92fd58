use pushkind_recipes::auth::AuthenticatedUser;
use pushkind_recipes::domain::user::User;
use pushkind_recipes::forms::recipes::{IngredientAmountForm, RecipeForm};
use pushkind_recipes::repository::{CartReader, FavoriteReader};
use pushkind_recipes::services::ServiceError;
use pushkind_recipes::services::favorites::{add_favorite, remove_favorite};
use pushkind_recipes::services::recipes::{
    RecipeQuery, create_recipe, load_recipes, modify_recipe, remove_recipe,
};
use pushkind_recipes::services::shopping_cart::{
    add_to_cart, encode_row, load_shopping_list, remove_from_cart,
};
use pushkind_recipes::services::subscriptions::{
    SubscriptionQuery, load_subscriptions, subscribe, unsubscribe,
};

mod common;

use common::{create_ingredient, create_recipe as seed_recipe, create_tag, create_user};

fn claims(user: &User) -> AuthenticatedUser {
    AuthenticatedUser::from(user)
}

#[test]
fn test_favorite_twice_keeps_one_row() {
    let test_db = common::TestDb::new("test_services_favorite_twice.db");
    let repo = test_db.repo();

    let author = create_user(&repo, "author");
    let fan = create_user(&repo, "fan");
    let other = create_user(&repo, "other");
    let flour = create_ingredient(&repo, "flour", "g");
    let recipe = seed_recipe(&repo, author.id, "Bagels", &[(flour.id, 400.0)], &[]);

    let summary = add_favorite(&repo, &claims(&fan), recipe.id).expect("first favorite");
    assert_eq!(summary.name, "Bagels");

    assert!(matches!(
        add_favorite(&repo, &claims(&fan), recipe.id),
        Err(ServiceError::Duplicate(_))
    ));
    assert_eq!(
        repo.favorited_recipe_ids(fan.id, &[recipe.id]).unwrap().len(),
        1
    );

    add_favorite(&repo, &claims(&other), recipe.id).expect("other user's favorite");
    assert!(matches!(
        remove_favorite(&repo, &claims(&author), recipe.id),
        Err(ServiceError::NotAssociated(_))
    ));
    assert!(repo.is_favorited(fan.id, recipe.id).unwrap());
    assert!(repo.is_favorited(other.id, recipe.id).unwrap());

    remove_favorite(&repo, &claims(&fan), recipe.id).expect("removes favorite");
    assert!(!repo.is_favorited(fan.id, recipe.id).unwrap());
    assert!(matches!(
        add_favorite(&repo, &claims(&fan), 4040),
        Err(ServiceError::NotFound)
    ));
}

#[test]
fn test_shopping_cart_export() {
    let test_db = common::TestDb::new("test_services_shopping_cart_export.db");
    let repo = test_db.repo();

    let author = create_user(&repo, "author");
    let shopper = create_user(&repo, "shopper");
    let flour = create_ingredient(&repo, "flour", "g");
    let sugar = create_ingredient(&repo, "sugar", "g");
    let eggs = create_ingredient(&repo, "eggs", "pcs");
    let salt = create_ingredient(&repo, "salt", "pinch");

    let a = seed_recipe(
        &repo,
        author.id,
        "A",
        &[(flour.id, 200.0), (sugar.id, 50.0)],
        &[],
    );
    let b = seed_recipe(
        &repo,
        author.id,
        "B",
        &[(flour.id, 100.0), (eggs.id, 2.0)],
        &[],
    );
    let c = seed_recipe(&repo, author.id, "C", &[(salt.id, 0.5)], &[]);

    let user = claims(&shopper);
    for recipe_id in [a.id, b.id, c.id] {
        add_to_cart(&repo, &user, recipe_id).expect("added to cart");
    }
    assert!(matches!(
        add_to_cart(&repo, &user, a.id),
        Err(ServiceError::Duplicate(_))
    ));

    remove_from_cart(&repo, &user, c.id).expect("removed from cart");
    assert!(!repo.is_in_cart(shopper.id, c.id).unwrap());

    let list = load_shopping_list(&repo, &user).expect("shopping list");
    let csv: Vec<u8> = list
        .into_rows()
        .flat_map(|row| encode_row(&row).expect("row encodes"))
        .collect();

    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "eggs,2,pcs\nflour,300,g\nsugar,50,g\n"
    );
}

#[test]
fn test_recipe_lifecycle_and_permissions() {
    let test_db = common::TestDb::new("test_services_recipe_lifecycle.db");
    let repo = test_db.repo();

    let author = create_user(&repo, "author");
    let stranger = create_user(&repo, "stranger");
    let flour = create_ingredient(&repo, "flour", "g");
    let milk = create_ingredient(&repo, "milk", "ml");
    let tag = create_tag(&repo, "breakfast");

    let form = |name: &str, ingredients: Vec<IngredientAmountForm>| RecipeForm {
        name: name.to_string(),
        image: None,
        text: "Mix and bake.".to_string(),
        cooking_time: 40,
        ingredients,
        tags: vec![tag.id],
    };

    let created = create_recipe(
        &repo,
        &claims(&author),
        form(
            "Muffins",
            vec![IngredientAmountForm {
                id: flour.id,
                amount: 250.0,
            }],
        ),
    )
    .expect("recipe created");
    assert_eq!(created.author.username, "author");
    assert!(!created.is_favorited);

    let denied = modify_recipe(
        &repo,
        &claims(&stranger),
        created.id,
        form("Stolen muffins", Vec::new()),
    );
    assert!(matches!(denied, Err(ServiceError::Forbidden)));

    let invalid = modify_recipe(
        &repo,
        &claims(&author),
        created.id,
        form(
            "Muffins",
            vec![IngredientAmountForm {
                id: 9999,
                amount: 1.0,
            }],
        ),
    );
    assert!(matches!(invalid, Err(ServiceError::Form(_))));

    let updated = modify_recipe(
        &repo,
        &claims(&author),
        created.id,
        form(
            "Milk muffins",
            vec![
                IngredientAmountForm {
                    id: flour.id,
                    amount: 200.0,
                },
                IngredientAmountForm {
                    id: milk.id,
                    amount: 100.0,
                },
            ],
        ),
    )
    .expect("recipe updated");
    assert_eq!(updated.ingredients.len(), 2);

    add_favorite(&repo, &claims(&stranger), created.id).expect("favorited");
    let query = RecipeQuery {
        is_favorited: Some(true),
        ..RecipeQuery::default()
    };
    let page = load_recipes(&repo, Some(&claims(&stranger)), query).expect("recipes listed");
    assert_eq!(page.count, 1);
    assert!(page.items[0].is_favorited);

    assert!(matches!(
        remove_recipe(&repo, &claims(&stranger), created.id),
        Err(ServiceError::Forbidden)
    ));
    remove_recipe(&repo, &claims(&author), created.id).expect("recipe removed");
    assert!(!repo.is_favorited(stranger.id, created.id).unwrap());
}

#[test]
fn test_subscription_flow() {
    let test_db = common::TestDb::new("test_services_subscription_flow.db");
    let repo = test_db.repo();

    let reader = create_user(&repo, "reader");
    let chef = create_user(&repo, "chef");
    let flour = create_ingredient(&repo, "flour", "g");
    for name in ["One", "Two", "Three"] {
        seed_recipe(&repo, chef.id, name, &[(flour.id, 1.0)], &[]);
    }

    let user = claims(&reader);
    let query = SubscriptionQuery {
        recipes_limit: Some(2),
        ..SubscriptionQuery::default()
    };

    assert!(matches!(
        subscribe(&repo, &user, reader.id, &query),
        Err(ServiceError::SelfSubscription)
    ));

    let author = subscribe(&repo, &user, chef.id, &query).expect("subscribed");
    assert_eq!(author.recipes_count, 3);
    assert_eq!(author.recipes.len(), 2);
    assert_eq!(author.recipes[0].name, "Three");

    assert!(matches!(
        subscribe(&repo, &user, chef.id, &query),
        Err(ServiceError::Duplicate(_))
    ));

    let page = load_subscriptions(&repo, &user, &SubscriptionQuery::default()).expect("listed");
    assert_eq!(page.count, 1);
    assert_eq!(page.items[0].recipes.len(), 3);
    assert!(page.items[0].user.is_subscribed);

    unsubscribe(&repo, &user, chef.id).expect("unsubscribed");
    assert!(matches!(
        unsubscribe(&repo, &user, chef.id),
        Err(ServiceError::NotAssociated(_))
    ));
}
