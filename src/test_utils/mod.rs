pub(crate) mod html;
pub(crate) mod mock_api;

pub(crate) use html::{
    assert_valid_html, must_select, parse_html_document, parse_html_fragment, select_all, text_of,
};
pub(crate) use mock_api::{
    MockApi, TEST_PASSWORD, TEST_TOKEN, TEST_USER_ID, test_categories, test_session,
};
