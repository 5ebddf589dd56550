/// Email template
#[derive(Serialize, Deserialize, Clone)]
pub struct Template {
    /// Title of the email
    pub title: String,
    /// Plain text version of this email
    pub text: String,
    /// HTML version of this email
    pub html: Option<String>,
    /// URL to redirect people to from the email
    ///
    /// Use `{{url}}` to fill this field.
    ///
    /// Any given URL will be suffixed with a unique token if applicable.
    ///
    /// e.g. `https://example.com?t=` becomes `https://example.com?t=UNIQUE_CODE`
    pub url: String,
}

/// Email templates
#[derive(Serialize, Deserialize, Clone)]
pub struct Templates {
    /// Template for email verification
    pub verify: Template,
    /// Template for password reset
    pub reset: Template,
    /// Template for temporary password delivery
    ///
    /// Use `{{code}}` to fill in the temporary password.
    pub temporary_password: Template,
}

impl Default for Templates {
    fn default() -> Templates {
        Templates {
            verify: Template {
                title: "Verify your email".into(),
                text: "Open the link to verify your email:\n{{url}}".into(),
                html: None,
                url: "https://example.com/verify?t=".into(),
            },
            reset: Template {
                title: "Reset your password".into(),
                text: "Open the link to reset your password:\n{{url}}".into(),
                html: None,
                url: "https://example.com/reset?t=".into(),
            },
            temporary_password: Template {
                title: "Your temporary password".into(),
                text: "Use this temporary password to sign in:\n{{code}}".into(),
                html: None,
                url: "".into(),
            },
        }
    }
}
