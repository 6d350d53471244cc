//! Customer notification rendering for placed orders.

use std::fmt::Write as _;

use super::{Order, PaymentStatus};

/// Default sender address for outgoing notifications.
pub const DEFAULT_SENDER: &str = "\"ShopEase\" <no-reply@shopease.com>";

/// Template chosen by payment outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationTemplate {
    OrderConfirmation,
    OrderDeclined,
}

impl NotificationTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OrderConfirmation => "order_confirmation",
            Self::OrderDeclined => "order_declined",
        }
    }
}

/// Rendered message ready for a sender adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderNotification {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
    pub html: String,
    pub template: NotificationTemplate,
    pub order_number: String,
}

impl OrderNotification {
    /// Render the confirmation or decline message for `order`.
    ///
    /// # Examples
    /// ```ignore
    /// let message = OrderNotification::render(&order, DEFAULT_SENDER);
    /// assert!(message.subject.starts_with("Your Order Confirmation #"));
    /// ```
    pub fn render(order: &Order, from: &str) -> Self {
        let approved = matches!(order.payment().status, PaymentStatus::Approved);
        let template = if approved {
            NotificationTemplate::OrderConfirmation
        } else {
            NotificationTemplate::OrderDeclined
        };
        let number = order.order_number().as_str();
        let subject = if approved {
            format!("Your Order Confirmation #{number}")
        } else {
            format!("Issue with Your Order #{number}")
        };

        let customer = order.customer();
        let product = order.product();
        let variant = product
            .variant
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");

        let mut text = format!("Hi {},\n\n", customer.full_name);
        let mut html = format!("<p>Hi {},</p>", escape_html(&customer.full_name));
        if approved {
            text.push_str("Thank you for your order. Your payment was approved.\n");
            html.push_str("<p>Thank you for your order. Your payment was approved.</p>");
        } else {
            text.push_str(
                "We could not process the payment for your order, so it has been cancelled.\n",
            );
            html.push_str(
                "<p>We could not process the payment for your order, so it has been cancelled.</p>",
            );
        }

        let _ = write!(
            text,
            "\nOrder: {number}\nProduct: {} x{}\n",
            product.name, product.quantity
        );
        let _ = write!(
            html,
            "<ul><li>Order: {}</li><li>Product: {} x{}</li>",
            escape_html(number),
            escape_html(&product.name),
            product.quantity
        );
        if !variant.is_empty() {
            let _ = writeln!(text, "Options: {variant}");
            let _ = write!(html, "<li>Options: {}</li>", escape_html(&variant));
        }
        let _ = writeln!(text, "Total: {}", order.total());
        let _ = write!(html, "<li>Total: {}</li></ul>", order.total());

        Self {
            to: customer.email.clone(),
            from: from.to_owned(),
            subject,
            text,
            html,
            template,
            order_number: number.to_owned(),
        }
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{
        CustomerDetails, Money, OrderNumber, PaymentOutcome, PostalAddress, ProductId,
        ProductSnapshot,
    };
    use chrono::Utc;
    use rstest::rstest;

    fn order(outcome: PaymentOutcome, name: &str) -> Order {
        Order::place(
            OrderNumber::generate(Utc::now(), 1),
            ProductSnapshot {
                id: ProductId::random(),
                name: "Mouse".into(),
                variant: BTreeMap::from([("size".to_owned(), "M".to_owned())]),
                quantity: 1,
                price: Money::from_major(20.0).expect("valid price"),
            },
            CustomerDetails {
                full_name: name.into(),
                email: "buyer@example.com".into(),
                phone: "555-0100".into(),
                address: PostalAddress::default(),
            },
            "4242".into(),
            outcome,
            Utc::now(),
        )
        .expect("valid order")
    }

    #[rstest]
    #[case(PaymentOutcome::Approved, NotificationTemplate::OrderConfirmation, "Your Order Confirmation #")]
    #[case(PaymentOutcome::Declined, NotificationTemplate::OrderDeclined, "Issue with Your Order #")]
    #[case(PaymentOutcome::Error, NotificationTemplate::OrderDeclined, "Issue with Your Order #")]
    fn template_follows_outcome(
        #[case] outcome: PaymentOutcome,
        #[case] template: NotificationTemplate,
        #[case] subject_prefix: &str,
    ) {
        let order = order(outcome, "Ada");
        let message = OrderNotification::render(&order, DEFAULT_SENDER);
        assert_eq!(message.template, template);
        assert_eq!(
            message.subject,
            format!("{subject_prefix}{}", order.order_number())
        );
        assert_eq!(message.to, "buyer@example.com");
        assert!(message.text.contains("Total: 20.00"));
    }

    #[rstest]
    fn html_escapes_customer_input() {
        let order = order(PaymentOutcome::Approved, "<script>alert('x')</script>");
        let message = OrderNotification::render(&order, DEFAULT_SENDER);
        assert!(!message.html.contains("<script>"));
        assert!(message.html.contains("&lt;script&gt;"));
    }

    #[rstest]
    fn escape_html_handles_all_special_characters() {
        assert_eq!(escape_html(r#"&<>"'"#), "&amp;&lt;&gt;&quot;&#39;");
    }
}
