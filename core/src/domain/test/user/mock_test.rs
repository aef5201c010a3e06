use crate::domain::{
    common::{CoreError, GetPaginated},
    test::{mock_service, seed_user},
    user::{
        entities::{
            NewProfile, QuestionId, RegisterUserInput, ResetPasswordInput, UpdateProfileInput,
            UserType,
        },
        ports::UserService,
    },
};

fn registration(email: &str, username: &str, password: &str) -> RegisterUserInput {
    RegisterUserInput {
        email: email.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        user_type: UserType::Personal,
        profile: NewProfile {
            name: "Alice Liddell".to_string(),
            bio: Some("Curiouser and curiouser".to_string()),
            ..NewProfile::default()
        },
    }
}

// == Register ==

#[tokio::test]
async fn test_register_success() -> Result<(), Box<dyn std::error::Error>> {
    let (service, _) = mock_service();

    let user = service
        .register(registration("alice@example.com", "alice", "Wonderland1"))
        .await?;

    assert_eq!(user.username, "alice");
    assert_ne!(user.password_hash, "Wonderland1", "password must be hashed");

    let profile = service.view_profile(&user.id).await?;
    assert_eq!(profile.name, "Alice Liddell");

    Ok(())
}

#[tokio::test]
async fn test_register_rejects_invalid_fields_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let (service, _) = mock_service();

    let cases = [
        (
            registration("not-an-email", "al", "weak"),
            "Invalid email format",
        ),
        (
            registration("alice@example.com", "al", "weak"),
            "Invalid username.",
        ),
        (
            registration("alice@example.com", "alice", "weakpassword"),
            "Invalid password.",
        ),
    ];

    for (input, expected) in cases {
        let result = service.register(input).await;
        assert_eq!(result.unwrap_err(), CoreError::validation(expected));
    }

    let mut nameless = registration("alice@example.com", "alice", "Wonderland1");
    nameless.profile.name = "   ".to_string();
    let result = service.register(nameless).await;
    assert_eq!(
        result.unwrap_err(),
        CoreError::validation("Name cannot be empty")
    );

    Ok(())
}

#[tokio::test]
async fn test_register_rejects_taken_email_and_username() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, _) = mock_service();
    service
        .register(registration("alice@example.com", "alice", "Wonderland1"))
        .await?;

    let same_email = service
        .register(registration("ALICE@example.com", "alice2", "Wonderland1"))
        .await;
    assert_eq!(
        same_email.unwrap_err(),
        CoreError::validation("Email already registered")
    );

    let same_username = service
        .register(registration("other@example.com", "alice", "Wonderland1"))
        .await;
    assert_eq!(
        same_username.unwrap_err(),
        CoreError::validation("Username already taken")
    );

    Ok(())
}

// == Login ==

#[tokio::test]
async fn test_login_by_email_or_username() -> Result<(), Box<dyn std::error::Error>> {
    let (service, _) = mock_service();
    let registered = service
        .register(registration("alice@example.com", "alice", "Wonderland1"))
        .await?;

    let by_email = service.login("alice@example.com", "Wonderland1").await?;
    assert_eq!(by_email.id, registered.id);

    let by_username = service.login("alice", "Wonderland1").await?;
    assert_eq!(by_username.id, registered.id);

    Ok(())
}

#[tokio::test]
async fn test_login_rejects_blank_and_wrong_credentials() -> Result<(), Box<dyn std::error::Error>>
{
    let (service, _) = mock_service();
    service
        .register(registration("alice@example.com", "alice", "Wonderland1"))
        .await?;

    assert_eq!(
        service.login("  ", "Wonderland1").await.unwrap_err(),
        CoreError::authentication("Email/Username cannot be empty")
    );
    assert_eq!(
        service.login("alice", "").await.unwrap_err(),
        CoreError::authentication("Password cannot be empty")
    );
    assert_eq!(
        service.login("alice", "Wrong1234").await.unwrap_err(),
        CoreError::authentication("Invalid email/username or password")
    );
    assert_eq!(
        service.login("nobody", "Wonderland1").await.unwrap_err(),
        CoreError::authentication("Invalid email/username or password")
    );

    Ok(())
}

// == Passwords ==

#[tokio::test]
async fn test_change_password() -> Result<(), Box<dyn std::error::Error>> {
    let (service, _) = mock_service();
    let user = service
        .register(registration("alice@example.com", "alice", "Wonderland1"))
        .await?;

    assert_eq!(
        service
            .change_password(&user.id, "Wrong1234", "Looking4Glass")
            .await
            .unwrap_err(),
        CoreError::authentication("Current password is incorrect")
    );
    assert_eq!(
        service
            .change_password(&user.id, "Wonderland1", "short")
            .await
            .unwrap_err(),
        CoreError::validation(
            "New password must be at least 8 characters with 1 uppercase and 1 number"
        )
    );
    assert_eq!(
        service
            .change_password(&user.id, "Wonderland1", "Wonderland1")
            .await
            .unwrap_err(),
        CoreError::validation("New password must be different from current password")
    );

    service
        .change_password(&user.id, "Wonderland1", "Looking4Glass")
        .await?;
    assert!(service.login("alice", "Looking4Glass").await.is_ok());
    assert!(service.login("alice", "Wonderland1").await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_reset_password_with_security_answer() -> Result<(), Box<dyn std::error::Error>> {
    let (service, _) = mock_service();
    let user = service
        .register(registration("alice@example.com", "alice", "Wonderland1"))
        .await?;

    let question = QuestionId(1);
    let reset = |answer: &str| ResetPasswordInput {
        email: "alice@example.com".to_string(),
        question_id: question,
        answer: answer.to_string(),
        new_password: "Looking4Glass".to_string(),
    };

    assert_eq!(
        service.reset_password(reset("Dinah")).await.unwrap_err(),
        CoreError::authentication("Security question not answered for this account")
    );

    service
        .set_security_answer(&user.id, question, "Dinah")
        .await?;

    assert_eq!(
        service.reset_password(reset("Cheshire")).await.unwrap_err(),
        CoreError::authentication("Security answer is incorrect")
    );

    service.reset_password(reset("  dinah ")).await?;
    assert!(service.login("alice", "Looking4Glass").await.is_ok());

    let unknown = ResetPasswordInput {
        email: "nobody@example.com".to_string(),
        ..reset("Dinah")
    };
    assert_eq!(
        service.reset_password(unknown).await.unwrap_err(),
        CoreError::authentication("Email not found")
    );

    Ok(())
}

#[tokio::test]
async fn test_set_security_answer_validates_question() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let user = seed_user(&repositories, "alice", UserType::Personal).await?;

    let questions = service.list_security_questions().await?;
    assert_eq!(questions.len(), 3);

    assert_eq!(
        service
            .set_security_answer(&user.id, QuestionId(99), "anything")
            .await
            .unwrap_err(),
        CoreError::validation("Security question not found")
    );
    assert!(
        service
            .set_security_answer(&user.id, QuestionId(1), "  ")
            .await
            .is_err()
    );

    Ok(())
}

// == Search & profiles ==

#[tokio::test]
async fn test_search_users() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    seed_user(&repositories, "alice", UserType::Personal).await?;
    seed_user(&repositories, "malice", UserType::Creator).await?;
    seed_user(&repositories, "bob", UserType::Business).await?;

    let (found, total) = service
        .search_users("ALI", &GetPaginated::default())
        .await?;
    assert_eq!(total, 2);
    assert_eq!(found[0].username, "alice");
    assert_eq!(found[1].username, "malice");

    assert_eq!(
        service
            .search_users("   ", &GetPaginated::default())
            .await
            .unwrap_err(),
        CoreError::validation("Search keyword cannot be empty")
    );

    let (nothing, total) = service
        .search_users("%%%", &GetPaginated::default())
        .await?;
    assert!(nothing.is_empty());
    assert_eq!(total, 0);

    Ok(())
}

#[tokio::test]
async fn test_update_profile_and_privacy() -> Result<(), Box<dyn std::error::Error>> {
    let (service, repositories) = mock_service();
    let user = seed_user(&repositories, "alice", UserType::Personal).await?;

    let blank_name = UpdateProfileInput {
        user_id: user.id,
        name: Some(" ".to_string()),
        bio: None,
        location: None,
        website: None,
        profile_picture_url: None,
    };
    assert_eq!(
        service.update_profile(blank_name).await.unwrap_err(),
        CoreError::validation("Name cannot be empty")
    );

    let profile = service
        .update_profile(UpdateProfileInput {
            user_id: user.id,
            name: None,
            bio: None,
            location: Some("Oxford".to_string()),
            website: None,
            profile_picture_url: None,
        })
        .await?;
    assert_eq!(profile.name, "alice", "untouched fields are kept");
    assert_eq!(profile.location.as_deref(), Some("Oxford"));
    assert!(profile.updated_at.is_some());

    let private = service.update_privacy(&user.id, true).await?;
    assert!(private.is_private);

    Ok(())
}

#[tokio::test]
async fn test_get_unknown_user_and_profile() -> Result<(), Box<dyn std::error::Error>> {
    let (service, _) = mock_service();
    let ghost = uuid::Uuid::new_v4().into();

    assert_eq!(
        service.get_user(&ghost).await.unwrap_err(),
        CoreError::validation("User not found")
    );
    assert_eq!(
        service.view_profile(&ghost).await.unwrap_err(),
        CoreError::validation("Profile not found")
    );

    Ok(())
}
