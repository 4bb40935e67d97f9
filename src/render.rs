//! Server-rendered storefront markup: the dual action buttons, the
//! variant-selection popup, its client script and the page styles.
//!
//! Settings come in as explicit values; nothing here reads global state.

use crate::config::PopupSettings;
use crate::domain::aggregates::Product;

/// How long the success message stays visible before the page reloads
/// after an add-to-cart commit.
pub const RELOAD_DELAY_MS: u32 = 1000;

/// Minimal HTML entity escaping for text and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn button_style(settings: &PopupSettings, color: &str) -> String {
    format!(
        "height: {}px; font-size: {}px; border-radius: {}px; border: none; cursor: pointer; \
         font-weight: bold; color: white; text-align: center; flex: 1; display: flex; \
         align-items: center; justify-content: center; gap: 5px; text-decoration: none; \
         background: {};",
        settings.height_px,
        settings.font_size_px,
        settings.radius_px,
        escape_html(color),
    )
}

/// One pair of action controls for a listing-page product.
///
/// Simple products get two direct links: checkout with the product
/// pre-added, and the listing-page ajax-add URL the host framework
/// intercepts. Variable products get two popup-opening buttons carrying
/// the product id and the action intent.
pub fn dual_buttons(settings: &PopupSettings, product: &Product, checkout_url: &str) -> String {
    let buy_label = escape_html(&settings.buy_now_label());
    let cart_label = escape_html(&settings.add_to_cart_label());
    let buy_style = button_style(settings, &settings.buy_now.color);
    let cart_style = button_style(settings, &settings.add_to_cart.color);
    let id = product.id();

    let mut html = String::from("<div class=\"sp-button-row\" style=\"display: flex; gap: 10px; margin-top: 10px;\">");
    if product.is_variable() {
        html.push_str(&format!(
            "<button class=\"button sp-open-popup\" data-intent=\"buy_now\" data-product-id=\"{id}\" style=\"{buy_style}\">{buy_label}</button>"
        ));
        html.push_str(&format!(
            "<button class=\"button sp-open-popup\" data-intent=\"add_to_cart\" data-product-id=\"{id}\" style=\"{cart_style}\">{cart_label}</button>"
        ));
    } else {
        let checkout = escape_html(checkout_url);
        html.push_str(&format!(
            "<a href=\"{checkout}?add-to-cart={id}\" class=\"button\" style=\"{buy_style}\">{buy_label}</a>"
        ));
        html.push_str(&format!(
            "<a href=\"?add-to-cart={id}\" data-quantity=\"1\" class=\"button add_to_cart_button ajax_add_to_cart\" data-product_id=\"{id}\" style=\"{cart_style}\">{cart_label}</a>"
        ));
    }
    html.push_str("</div>");
    html
}

/// The popup overlay. Emitted once per page; the script fills the title
/// and variation slots per invocation.
pub fn popup_markup(settings: &PopupSettings) -> String {
    let qty_label = escape_html(&settings.messages.quantity_label);
    let action_label = escape_html(&settings.add_to_cart_label());
    format!(
        "<div id=\"sp-popup-overlay\">\
           <div id=\"sp-popup\">\
             <button id=\"sp-popup-close\" aria-label=\"Close\">&times;</button>\
             <h3 id=\"sp-popup-title\"></h3>\
             <div id=\"sp-popup-variations\"></div>\
             <div class=\"sp-quantity-row\">\
               <label for=\"sp-popup-quantity\">{qty_label}</label>\
               <input type=\"number\" id=\"sp-popup-quantity\" value=\"1\" min=\"1\">\
             </div>\
             <button id=\"sp-popup-action\">{action_label}</button>\
             <div id=\"sp-popup-message\"></div>\
           </div>\
         </div>"
    )
}

/// The client side of the selection workflow. The selected variant id is
/// held in a plain variable; nothing is inferred from rendered styling.
pub fn popup_script(settings: &PopupSettings, ajax_base: &str, checkout_url: &str) -> String {
    let config = serde_json::json!({
        "ajaxBase": ajax_base,
        "checkoutUrl": checkout_url,
        "reloadDelayMs": RELOAD_DELAY_MS,
        "labels": {
            "buyNow": settings.buy_now_label(),
            "addToCart": settings.add_to_cart_label(),
        },
        "colors": {
            "buyNow": settings.buy_now.color,
            "addToCart": settings.add_to_cart.color,
        },
        "messages": {
            "variantHeading": settings.messages.variant_heading,
            "selectVariant": settings.messages.select_variant_warning,
            "committing": settings.messages.committing,
            "addSuccess": settings.messages.add_success,
            "commitFailure": settings.messages.commit_failure,
            "outOfStockTag": settings.messages.out_of_stock_tag,
        },
    });
    format!("<script>\nconst SP_CONFIG = {config};\n{SCRIPT_BODY}\n</script>")
}

const SCRIPT_BODY: &str = r#"(function () {
  'use strict';
  var productId = 0;
  var intent = 'add_to_cart';
  var selectedVariation = null;
  var committing = false;

  var overlay = document.getElementById('sp-popup-overlay');
  var titleEl = document.getElementById('sp-popup-title');
  var optionsEl = document.getElementById('sp-popup-variations');
  var qtyEl = document.getElementById('sp-popup-quantity');
  var actionBtn = document.getElementById('sp-popup-action');
  var messageEl = document.getElementById('sp-popup-message');

  function post(action, params) {
    return fetch(SP_CONFIG.ajaxBase + '/' + action, {
      method: 'POST',
      headers: { 'Content-Type': 'application/x-www-form-urlencoded' },
      body: new URLSearchParams(params || {}).toString()
    }).then(function (r) { return r.json(); });
  }

  function showMessage(text, ok) {
    messageEl.textContent = text;
    messageEl.className = ok ? 'sp-message sp-message-ok' : 'sp-message sp-message-error';
    messageEl.style.display = 'block';
  }

  function setControlsDisabled(disabled) {
    actionBtn.disabled = disabled;
    qtyEl.disabled = disabled;
    optionsEl.querySelectorAll('.sp-variation-option').forEach(function (btn) {
      if (btn.dataset.inStock === '1') { btn.disabled = disabled; }
    });
  }

  function refreshCartIndicators() {
    // Fragments first, then the numeric count: the fragment payload does
    // not cover every custom counter element on the page.
    post('get_cart_fragments').then(function (res) {
      if (!res || !res.fragments) { return; }
      Object.keys(res.fragments).forEach(function (selector) {
        document.querySelectorAll(selector).forEach(function (el) {
          el.outerHTML = res.fragments[selector];
        });
      });
      return post('get_cart_count').then(function (res2) {
        if (!res2.success) { return; }
        document.querySelectorAll('.cart-contents-count, .cart-count, .header-cart-count').forEach(function (el) {
          el.textContent = res2.data.count;
        });
      });
    }).catch(function () {
      // Fire-and-forget: the add already succeeded.
    });
  }

  function closePopup() {
    if (committing) { return; }
    overlay.style.display = 'none';
    messageEl.style.display = 'none';
    selectedVariation = null;
  }

  function renderOptions(data) {
    titleEl.textContent = data.title;
    var heading = document.createElement('div');
    heading.className = 'sp-variation-heading';
    heading.textContent = SP_CONFIG.messages.variantHeading;
    var grid = document.createElement('div');
    grid.className = 'sp-variation-grid';
    data.variations.forEach(function (variation) {
      var btn = document.createElement('button');
      btn.className = 'sp-variation-option';
      btn.dataset.variationId = variation.variation_id;
      btn.dataset.inStock = variation.is_in_stock ? '1' : '0';
      btn.textContent = variation.attributes;
      if (!variation.is_in_stock) {
        btn.disabled = true;
        var tag = document.createElement('small');
        tag.textContent = SP_CONFIG.messages.outOfStockTag;
        btn.appendChild(document.createElement('br'));
        btn.appendChild(tag);
      } else {
        btn.addEventListener('click', function () {
          if (committing) { return; }
          selectedVariation = parseInt(btn.dataset.variationId, 10);
          grid.querySelectorAll('.sp-variation-option').forEach(function (other) {
            other.classList.remove('selected');
          });
          btn.classList.add('selected');
        });
      }
      grid.appendChild(btn);
    });
    optionsEl.innerHTML = '';
    optionsEl.appendChild(heading);
    optionsEl.appendChild(grid);
  }

  function openPopup(id, newIntent) {
    productId = id;
    intent = newIntent;
    selectedVariation = null;
    qtyEl.value = 1;
    post('get_product_variations', { product_id: productId }).then(function (res) {
      if (!res.success) { return; }
      renderOptions(res.data);
      var label = intent === 'buy_now' ? SP_CONFIG.labels.buyNow : SP_CONFIG.labels.addToCart;
      var color = intent === 'buy_now' ? SP_CONFIG.colors.buyNow : SP_CONFIG.colors.addToCart;
      actionBtn.textContent = label;
      actionBtn.style.background = color;
      messageEl.style.display = 'none';
      overlay.style.display = 'flex';
    });
  }

  function submitCheckout(quantity) {
    var form = document.createElement('form');
    form.method = 'POST';
    form.action = SP_CONFIG.checkoutUrl;
    [['add-to-cart', productId], ['variation_id', selectedVariation], ['quantity', quantity]]
      .forEach(function (field) {
        var input = document.createElement('input');
        input.type = 'hidden';
        input.name = field[0];
        input.value = field[1];
        form.appendChild(input);
      });
    document.body.appendChild(form);
    form.submit();
  }

  function commit() {
    if (committing) { return; }
    if (selectedVariation === null) {
      showMessage(SP_CONFIG.messages.selectVariant, false);
      return;
    }
    var quantity = Math.max(1, parseInt(qtyEl.value, 10) || 1);
    // Lock before branching so a second click cannot submit twice while
    // the checkout navigation or the ajax call is in flight.
    committing = true;
    setControlsDisabled(true);
    if (intent === 'buy_now') {
      submitCheckout(quantity);
      return;
    }
    var originalLabel = actionBtn.textContent;
    actionBtn.textContent = SP_CONFIG.messages.committing;
    post('add_variation_to_cart', {
      product_id: productId,
      variation_id: selectedVariation,
      quantity: quantity
    }).then(function (res) {
      actionBtn.textContent = originalLabel;
      if (res.success) {
        showMessage(SP_CONFIG.messages.addSuccess, true);
        refreshCartIndicators();
        setTimeout(function () { window.location.reload(); }, SP_CONFIG.reloadDelayMs);
      } else {
        committing = false;
        setControlsDisabled(false);
        showMessage(SP_CONFIG.messages.commitFailure, false);
      }
    }).catch(function () {
      committing = false;
      setControlsDisabled(false);
      actionBtn.textContent = originalLabel;
      showMessage(SP_CONFIG.messages.commitFailure, false);
    });
  }

  document.querySelectorAll('.sp-open-popup').forEach(function (btn) {
    btn.addEventListener('click', function (e) {
      e.preventDefault();
      openPopup(parseInt(btn.dataset.productId, 10), btn.dataset.intent);
    });
  });
  document.getElementById('sp-popup-close').addEventListener('click', closePopup);
  overlay.addEventListener('click', function (e) {
    if (e.target === overlay) { closePopup(); }
  });
  actionBtn.addEventListener('click', commit);
})();"#;

/// Page styles: popup layout, option states and host-notice hiding.
pub fn page_styles(settings: &PopupSettings) -> String {
    let cart_color = escape_html(&settings.add_to_cart.color);
    format!(
        "<style>\n\
         #sp-popup-overlay {{ display: none; position: fixed; top: 0; left: 0; width: 100%; height: 100%; background: rgba(0,0,0,0.7); z-index: 9999; justify-content: center; align-items: center; }}\n\
         #sp-popup {{ background: white; padding: 30px; border-radius: 10px; max-width: 500px; width: 90%; position: relative; box-shadow: 0 5px 30px rgba(0,0,0,0.3); max-height: 90vh; overflow-y: auto; }}\n\
         #sp-popup-close {{ position: absolute; top: 10px; right: 10px; background: #ff4444; color: white; border: none; width: 35px; height: 35px; border-radius: 50%; cursor: pointer; font-size: 24px; line-height: 1; font-weight: bold; }}\n\
         .sp-variation-heading {{ font-weight: bold; margin-bottom: 12px; font-size: 16px; }}\n\
         .sp-variation-grid {{ display: grid; grid-template-columns: repeat(3, 1fr); gap: 10px; margin-bottom: 15px; }}\n\
         .sp-variation-option {{ background: white; border: 2px solid {cart_color}; color: #333; padding: 14px 10px; border-radius: 5px; cursor: pointer; font-weight: bold; transition: all 0.3s; font-size: 15px; }}\n\
         .sp-variation-option.selected {{ background: {cart_color}; border-color: {cart_color}; color: white; }}\n\
         .sp-variation-option:disabled {{ background: #f5f5f5; border-color: #ddd; color: #999; cursor: not-allowed; }}\n\
         .sp-variation-option:hover:not(:disabled) {{ transform: scale(1.05); box-shadow: 0 3px 10px rgba(0,0,0,0.2); }}\n\
         .sp-quantity-row {{ display: flex; gap: 10px; align-items: center; margin-bottom: 20px; }}\n\
         .sp-quantity-row label {{ font-weight: bold; font-size: 16px; }}\n\
         #sp-popup-quantity {{ width: 80px; padding: 10px; border: 2px solid #ddd; border-radius: 5px; font-size: 16px; }}\n\
         #sp-popup-action {{ background: {cart_color}; color: white; width: 100%; padding: 15px; border: none; border-radius: 5px; cursor: pointer; font-weight: bold; font-size: 18px; }}\n\
         #sp-popup-action:hover:not(:disabled) {{ opacity: 0.9; transform: translateY(-2px); }}\n\
         #sp-popup-action:disabled {{ opacity: 0.6; cursor: wait; }}\n\
         .sp-message {{ margin-top: 15px; padding: 12px; border-radius: 5px; display: none; text-align: center; font-weight: bold; }}\n\
         .sp-message-ok {{ background: #28a745; color: white; }}\n\
         .sp-message-error {{ background: #ff4444; color: white; }}\n\
         .store-notice, .storefront-notice {{ display: none !important; }}\n\
         @media (max-width: 768px) {{\n\
           .sp-button-row {{ flex-direction: column !important; gap: 8px !important; }}\n\
           .sp-button-row .button {{ width: 100% !important; flex: none !important; }}\n\
           #sp-popup {{ padding: 20px !important; width: 95% !important; }}\n\
           .sp-variation-option {{ font-size: 13px !important; padding: 10px 8px !important; }}\n\
         }}\n\
         </style>"
    )
}

/// Mini-cart fragment, keyed by the host's cart widget selector.
pub fn mini_cart_fragment(count: u32) -> String {
    format!(
        "<div class=\"widget_shopping_cart_content\"><p class=\"sp-mini-cart-total\">{count} item(s) in cart</p></div>"
    )
}

/// Header cart link fragment, including a counter element.
pub fn cart_link_fragment(count: u32) -> String {
    format!(
        "<a class=\"cart-contents\" href=\"/cart\">Cart (<span class=\"cart-contents-count\">{count}</span>)</a>"
    )
}

/// A complete listing page: header with cart indicators, one button pair
/// per product, the popup markup, styles and script.
pub fn listing_page(
    settings: &PopupSettings,
    products: &[Product],
    cart_count: u32,
    checkout_url: &str,
    ajax_base: &str,
) -> String {
    let mut items = String::new();
    for product in products {
        items.push_str(&format!(
            "<div class=\"sp-product\"><h4>{}</h4>{}</div>",
            escape_html(product.name()),
            dual_buttons(settings, product, checkout_url)
        ));
    }
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Shop</title>\n{styles}\n</head>\n<body>\n\
         <header class=\"sp-header\">{cart_link}</header>\n\
         <main class=\"sp-products\">{items}</main>\n\
         {popup}\n{script}\n</body>\n</html>",
        styles = page_styles(settings),
        cart_link = cart_link_fragment(cart_count),
        popup = popup_markup(settings),
        script = popup_script(settings, ajax_base, checkout_url),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Product, Variant};
    use crate::domain::value_objects::Money;
    use rust_decimal::Decimal;

    fn variable_product() -> Product {
        Product::variable(
            101,
            "Classic Tee",
            vec![Variant {
                id: 5,
                attributes: "Small".into(),
                price: Money::usd(Decimal::new(2500, 2)),
                in_stock: true,
            }],
        )
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"O'Neill\" & Co</b>"),
            "&lt;b&gt;&quot;O&#39;Neill&quot; &amp; Co&lt;/b&gt;"
        );
    }

    #[test]
    fn test_simple_product_renders_direct_links() {
        let settings = PopupSettings::default();
        let html = dual_buttons(&settings, &Product::simple(7, "Mug"), "https://shop.test/checkout");
        assert!(html.contains("href=\"https://shop.test/checkout?add-to-cart=7\""));
        assert!(html.contains("href=\"?add-to-cart=7\""));
        assert!(html.contains("data-quantity=\"1\""));
        assert!(html.contains("ajax_add_to_cart"));
        assert!(!html.contains("sp-open-popup"));
    }

    #[test]
    fn test_variable_product_renders_popup_triggers() {
        let settings = PopupSettings::default();
        let html = dual_buttons(&settings, &variable_product(), "https://shop.test/checkout");
        assert!(html.contains("data-intent=\"buy_now\""));
        assert!(html.contains("data-intent=\"add_to_cart\""));
        assert!(html.contains("data-product-id=\"101\""));
        assert!(!html.contains("add-to-cart=101"));
    }

    #[test]
    fn test_button_labels_and_colors_come_from_settings() {
        let mut settings = PopupSettings::default();
        settings.buy_now.icon = Some("⚡".to_string());
        let html = dual_buttons(&settings, &variable_product(), "/checkout");
        assert!(html.contains("⚡ Buy Now"));
        assert!(html.contains("background: #FF6B35;"));
        assert!(html.contains("background: #28a745;"));
        assert!(html.contains("height: 45px;"));
        assert!(html.contains("font-size: 15px;"));
        assert!(html.contains("border-radius: 5px;"));
    }

    #[test]
    fn test_settings_text_is_escaped() {
        let mut settings = PopupSettings::default();
        settings.add_to_cart.text = "<script>alert(1)</script>".to_string();
        let html = dual_buttons(&settings, &variable_product(), "/checkout");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_popup_markup_has_quantity_floor() {
        let html = popup_markup(&PopupSettings::default());
        assert!(html.contains("min=\"1\""));
        assert!(html.contains("value=\"1\""));
        assert!(html.contains("sp-popup-close"));
    }

    #[test]
    fn test_popup_script_carries_checkout_fields_and_delay() {
        let html = popup_script(&PopupSettings::default(), "/ajax", "https://shop.test/checkout");
        assert!(html.contains("'add-to-cart'"));
        assert!(html.contains("'variation_id'"));
        assert!(html.contains("'quantity'"));
        assert!(html.contains("\"reloadDelayMs\":1000"));
        assert!(html.contains("get_cart_fragments"));
        assert!(html.contains("get_cart_count"));
        assert!(html.contains("https://shop.test/checkout"));
    }

    #[test]
    fn test_script_locks_controls_before_checkout_submit() {
        let script = popup_script(&PopupSettings::default(), "/ajax", "/checkout");
        let lock = script.find("committing = true;").expect("lock assignment");
        let disable = script.find("setControlsDisabled(true);").expect("disable call");
        let submit = script.find("submitCheckout(quantity);").expect("checkout submit");
        assert!(lock < submit);
        assert!(disable < submit);
    }

    #[test]
    fn test_fragments_carry_count() {
        assert!(mini_cart_fragment(3).contains("3 item(s)"));
        assert!(cart_link_fragment(3).contains("<span class=\"cart-contents-count\">3</span>"));
    }

    #[test]
    fn test_listing_page_includes_all_pieces() {
        let settings = PopupSettings::default();
        let products = vec![Product::simple(7, "Mug"), variable_product()];
        let html = listing_page(&settings, &products, 0, "/checkout", "/ajax");
        assert!(html.contains("Classic Tee"));
        assert!(html.contains("Mug"));
        assert!(html.contains("sp-popup-overlay"));
        assert!(html.contains("<script>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("cart-contents-count"));
    }
}
