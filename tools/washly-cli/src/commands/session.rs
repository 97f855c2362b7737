//! Sign-in and sign-out.

use anyhow::Result;
use washly_auth::Identity;

use super::LoginArgs;
use crate::context::Context;

/// Run the login command.
pub fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let mut identity = Identity::from_email(&args.email)?;
    if let Some(name) = args.name {
        identity.name = name;
    }
    if let Some(phone) = args.phone {
        identity = identity.with_phone(phone);
    }

    let mut storefront = ctx.storefront()?;
    storefront.sign_in(identity.clone())?;
    ctx.remember(&identity)?;

    if ctx.output.is_json() {
        ctx.output.json(&identity);
    } else {
        ctx.output
            .success(&format!("Signed in as {} <{}>", identity.display_name(), identity.email));
    }
    Ok(())
}

/// Run the logout command. The cart belongs to the signed-out user and is cleared.
pub fn logout(ctx: &Context) -> Result<()> {
    let mut storefront = ctx.storefront()?;
    let Some(identity) = storefront.current_user().cloned() else {
        ctx.output.info("Not signed in");
        return Ok(());
    };

    storefront.sign_out();
    ctx.sessions()?.clear()?;
    ctx.output
        .success(&format!("Signed out {}", identity.display_name()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use washly_auth::PackageSelection;

    #[test]
    fn test_login_then_logout_clears_cart() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::in_dir(dir.path());

        login(
            LoginArgs {
                email: "Asha@Example.com".to_string(),
                name: Some("Asha Rao".to_string()),
                phone: None,
            },
            &ctx,
        )
        .unwrap();
        let identity = ctx.current_identity().unwrap().unwrap();
        assert_eq!(identity.email, "asha@example.com");
        assert_eq!(identity.name, "Asha Rao");

        let mut storefront = ctx.storefront().unwrap();
        storefront
            .add_package(&PackageSelection::new("car-basic"))
            .unwrap();
        assert_eq!(ctx.storefront().unwrap().cart().count(), 1);

        logout(&ctx).unwrap();
        assert!(ctx.current_identity().unwrap().is_none());
        assert!(ctx.storefront().unwrap().cart().is_empty());
    }
}
